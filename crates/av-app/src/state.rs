use std::path::Path;
use std::sync::Arc;

use av_client::{ApiClient, ApiConfig, ClientError, SketchFile};
use av_core::{MeshOutput, RenderOutput};
use av_viewer::{MeshRenderer, MeshViewport, OrbitCamera, SceneGraph, ViewerError, decode_glb};
use egui_wgpu::wgpu;
use egui_wgpu::wgpu::StoreOp;
use log::{info, warn};
use winit::event::WindowEvent;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use crate::events::{AvEvent, NetEvent, UiEvent};
use crate::gallery::{Gallery, decode_thumbnail};
use crate::gfx::GfxState;
use crate::store::ResultStore;
use crate::ui::{Tab, UiEventSender, UiState, UiView};

pub struct AppState {
    pub(crate) window: Arc<Window>,
    event_loop_proxy: Arc<EventLoopProxy<AvEvent>>,

    pub gfx: GfxState,
    pub ui: UiState,

    // 3D renderer state
    pub renderer: MeshRenderer,
    pub camera: OrbitCamera,
    pub viewport: MeshViewport,

    // Backend plumbing
    client: Arc<ApiClient>,
    runtime: tokio::runtime::Handle,

    // App-side state exposed to UI
    pub tab: Tab,
    pub backend_ok: Option<bool>,
    pub render_store: ResultStore<RenderOutput>,
    pub mesh_store: ResultStore<MeshOutput>,
    pub gallery: Gallery,

    // Mouse state
    pub orbit_pressed: bool,
    pub pan_pressed: bool,
    pub last_mouse_pos: Option<(f32, f32)>,
}

impl AppState {
    pub async fn new(
        window: Arc<Window>,
        event_loop_proxy: Arc<EventLoopProxy<AvEvent>>,
    ) -> anyhow::Result<Self> {
        let config = ApiConfig::load();
        info!("Backend base URL: {}", config.base_url);
        let client = Arc::new(ApiClient::new(config.base_url));

        let gfx = GfxState::new(window.clone()).await?;
        let ui = UiState::new(&gfx, window.clone());

        let renderer = MeshRenderer::new(gfx.device.clone(), gfx.queue.clone(), gfx.config.format);

        let mut camera = OrbitCamera::default();
        let size = window.inner_size();
        camera.set_aspect(size.width as f32 / size.height.max(1) as f32);

        let runtime = tokio::runtime::Handle::current();

        let state = Self {
            window,
            event_loop_proxy,
            gfx,
            ui,
            renderer,
            camera,
            viewport: MeshViewport::default(),
            client,
            runtime,
            tab: Tab::default(),
            backend_ok: None,
            render_store: ResultStore::default(),
            mesh_store: ResultStore::default(),
            gallery: Gallery::default(),
            orbit_pressed: false,
            pan_pressed: false,
            last_mouse_pos: None,
        };

        state.probe_backend();

        Ok(state)
    }

    fn push_net(&self, event: NetEvent) {
        let _ = self.event_loop_proxy.send_event(AvEvent::Net(event));
    }

    fn probe_backend(&self) {
        let client = self.client.clone();
        let proxy = self.event_loop_proxy.clone();
        self.runtime.spawn(async move {
            let outcome = client.health().await;
            let _ = proxy.send_event(AvEvent::Net(NetEvent::Health(outcome)));
        });
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.camera
                .set_aspect(new_size.width as f32 / new_size.height as f32);
        }
    }

    pub fn reset_camera(&mut self) {
        let aspect = self.camera.aspect;
        self.camera = OrbitCamera::default();
        self.camera.set_aspect(aspect);
        if let Some(scene) = self.viewport.scene() {
            let (min, max) = scene.bounds();
            self.camera.frame(min, max);
        }
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        use winit::event::{ElementState, MouseButton, MouseScrollDelta};

        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.orbit_pressed = pressed,
                    MouseButton::Right | MouseButton::Middle => self.pan_pressed = pressed,
                    _ => return false,
                }
                if !self.orbit_pressed && !self.pan_pressed {
                    self.last_mouse_pos = None;
                }
                true
            }

            WindowEvent::CursorMoved { position, .. } => {
                let pos = (position.x as f32, position.y as f32);

                if let Some((lx, ly)) = self.last_mouse_pos {
                    let dx = pos.0 - lx;
                    let dy = pos.1 - ly;
                    if self.orbit_pressed {
                        self.camera.orbit(dx, dy);
                    } else if self.pan_pressed {
                        self.camera.pan(dx, dy);
                    }
                }

                self.last_mouse_pos = Some(pos);
                self.orbit_pressed || self.pan_pressed
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 10.0,
                };
                self.camera.zoom(scroll);
                true
            }

            _ => false,
        }
    }

    pub fn mouse_dragging(&self) -> bool {
        self.orbit_pressed || self.pan_pressed
    }

    pub fn on_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SelectTab(tab) => {
                self.tab = tab;
            }
            UiEvent::ResetCamera => {
                self.reset_camera();
            }
            UiEvent::SubmitRender { params, files } => {
                // clear the stale batch before the new request leaves
                self.gallery.clear();
                let seq = self.render_store.begin();

                let client = self.client.clone();
                let proxy = self.event_loop_proxy.clone();
                self.runtime.spawn(async move {
                    let outcome = async {
                        let sketches = read_sketches(&files)?;
                        client.submit_render(&params, &sketches).await
                    }
                    .await;
                    let _ = proxy.send_event(AvEvent::Net(NetEvent::RenderDone { seq, outcome }));
                });
            }
            UiEvent::SubmitMesh { params, file } => {
                self.viewport.clear();
                self.renderer.clear_scene();
                let seq = self.mesh_store.begin();

                let client = self.client.clone();
                let proxy = self.event_loop_proxy.clone();
                self.runtime.spawn(async move {
                    let outcome = async {
                        let sketch = read_sketch(&file)?;
                        client.submit_mesh(&params, &sketch).await
                    }
                    .await;
                    let _ = proxy.send_event(AvEvent::Net(NetEvent::MeshDone { seq, outcome }));
                });
            }
        }
    }

    pub fn on_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::Health(outcome) => {
                if let Err(ref e) = outcome {
                    warn!("Backend health probe failed: {e}");
                }
                self.backend_ok = Some(outcome.is_ok());
            }

            NetEvent::RenderDone { seq, outcome } => {
                if !self.render_store.complete(seq, outcome) {
                    return;
                }
                if let Some(output) = self.render_store.result() {
                    info!(
                        "Render batch {} complete with {} image(s)",
                        output.batch_id,
                        output.images.len()
                    );
                    self.gallery.reset(self.client.base_url(), output);
                    self.fetch_thumbnails();
                }
            }

            NetEvent::MeshDone { seq, outcome } => {
                if !self.mesh_store.complete(seq, outcome) {
                    return;
                }
                if let Some(output) = self.mesh_store.result() {
                    match output.glb() {
                        Some(path) => {
                            let url = self.client.asset_url(path);
                            self.load_scene(url);
                        }
                        None => {
                            warn!("Mesh batch {} has no glb asset", output.batch_id);
                        }
                    }
                }
            }

            NetEvent::SceneLoaded { generation, result } => {
                if !self.viewport.finish_load(generation, result) {
                    return;
                }
                match self.viewport.scene() {
                    Some(scene) => {
                        info!("Scene ready: {} vertices", scene.vertex_count());
                        self.renderer.load_scene(scene);
                        let (min, max) = scene.bounds();
                        self.camera.frame(min, max);
                    }
                    None => self.renderer.clear_scene(),
                }
            }

            NetEvent::ThumbnailLoaded {
                batch_id,
                index,
                image,
            } => {
                let texture = self.ui.egui_ctx.load_texture(
                    format!("thumb-{batch_id}-{index}"),
                    image,
                    Default::default(),
                );
                self.gallery.set_texture(&batch_id, index, texture);
            }
        }
    }

    /// Download and decode every thumbnail of the current batch.
    fn fetch_thumbnails(&self) {
        let Some(batch_id) = self.gallery.batch_id.clone() else {
            return;
        };

        for (index, tile) in self.gallery.tiles.iter().enumerate() {
            let url = tile.url.clone();
            let batch_id = batch_id.clone();
            let client = self.client.clone();
            let proxy = self.event_loop_proxy.clone();

            self.runtime.spawn(async move {
                let bytes = match client.fetch_bytes(&url).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Thumbnail fetch failed for {url}: {e}");
                        return;
                    }
                };
                let Some(image) = decode_thumbnail(&bytes) else {
                    warn!("Thumbnail decode failed for {url}");
                    return;
                };
                let _ = proxy.send_event(AvEvent::Net(NetEvent::ThumbnailLoaded {
                    batch_id,
                    index,
                    image,
                }));
            });
        }
    }

    /// Kick off fetch + decode of the scene at `url`. The completion carries
    /// the viewport generation so superseded loads are dropped.
    fn load_scene(&mut self, url: String) {
        let generation = self.viewport.begin_load(url.clone());
        self.renderer.clear_scene();

        let client = self.client.clone();
        let proxy = self.event_loop_proxy.clone();
        self.runtime.spawn(async move {
            let result = fetch_and_decode(&client, &url).await;
            let _ = proxy.send_event(AvEvent::Net(NetEvent::SceneLoaded { generation, result }));
        });
    }

    fn downloads(&self) -> Vec<(String, String)> {
        match self.mesh_store.result() {
            Some(output) => av_core::asset_downloads(self.client.base_url(), output),
            None => Vec::new(),
        }
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }

        let output = self.gfx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // 3D scene
        if self.tab == Tab::Mesh && self.renderer.has_scene() {
            self.renderer
                .render(&mut encoder, &view, &self.gfx.depth_view, &self.camera);
        } else {
            let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        }

        // UI
        let ui_view = UiView {
            tab: self.tab,
            base_url: self.client.base_url(),
            backend_ok: self.backend_ok,
            render_phase: self.render_store.phase(),
            gallery: &self.gallery.tiles,
            mesh_phase: self.mesh_store.phase(),
            downloads: self.downloads(),
            viewer: self.viewport.phase(),
        };
        let mut sender = UiEventSender::new(self.event_loop_proxy.clone());
        let full_output = self.ui.draw(&self.window, &mut sender, &ui_view);

        let platform_output = full_output.platform_output.clone();
        self.ui
            .egui_state
            .handle_platform_output(&self.window, platform_output);

        let shapes = full_output.shapes.clone();
        let pixels_per_point = full_output.pixels_per_point;
        let paint_jobs = self.ui.egui_ctx.tessellate(shapes, pixels_per_point);

        let screen_desc = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.ui
                .egui_renderer
                .update_texture(&self.gfx.device, &self.gfx.queue, *id, delta);
        }

        self.ui.egui_renderer.update_buffers(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            &paint_jobs,
            &screen_desc,
        );

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            self.ui
                .egui_renderer
                .render(&mut rpass.forget_lifetime(), &paint_jobs, &screen_desc);
        }

        for id in &full_output.textures_delta.free {
            self.ui.egui_renderer.free_texture(id);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn read_sketch(path: &Path) -> Result<SketchFile, ClientError> {
    SketchFile::read(path)
        .map_err(|e| ClientError::Validation(format!("cannot read {}: {e}", path.display())))
}

fn read_sketches(paths: &[std::path::PathBuf]) -> Result<Vec<SketchFile>, ClientError> {
    paths.iter().map(|p| read_sketch(p)).collect()
}

async fn fetch_and_decode(client: &ApiClient, url: &str) -> Result<SceneGraph, ViewerError> {
    let bytes = client
        .fetch_bytes(url)
        .await
        .map_err(|e| ViewerError::Fetch(e.to_string()))?;

    // glTF decode is CPU-bound; keep it off the async workers
    tokio::task::spawn_blocking(move || decode_glb(&bytes))
        .await
        .map_err(|e| ViewerError::Decode(e.to_string()))?
}
