pub mod panels;

use std::sync::Arc;

use av_core::{MeshOutput, RenderOutput};
use av_viewer::ViewerPhase;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use crate::events::{AvEvent, UiEvent};
use crate::gallery::GalleryTile;
use crate::gfx::GfxState;
use crate::store::JobPhase;
use crate::ui::panels::Panels;

/// Active workspace tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Render,
    Mesh,
}

/// Queues UI intents raised during a frame back onto the event loop, so
/// panels never mutate application state directly.
pub struct UiEventSender {
    proxy: Arc<EventLoopProxy<AvEvent>>,
}

impl UiEventSender {
    pub fn new(proxy: Arc<EventLoopProxy<AvEvent>>) -> Self {
        Self { proxy }
    }

    pub fn instant(&mut self, event: UiEvent) {
        let _ = self.proxy.send_event(AvEvent::Ui(event));
    }
}

/// Read-only snapshot of application state handed to the panels each frame.
/// Renderers never mutate results; they only look at them.
pub struct UiView<'a> {
    pub tab: Tab,
    pub base_url: &'a str,
    /// None until the startup health probe answers.
    pub backend_ok: Option<bool>,
    pub render_phase: &'a JobPhase<RenderOutput>,
    pub gallery: &'a [GalleryTile],
    pub mesh_phase: &'a JobPhase<MeshOutput>,
    /// (label, absolute URL) pairs for the mesh batch's downloadable assets.
    pub downloads: Vec<(String, String)>,
    pub viewer: &'a ViewerPhase,
}

pub struct UiState {
    pub egui_state: egui_winit::State,
    pub egui_ctx: egui::Context,
    pub egui_renderer: egui_wgpu::Renderer,
    pub panels: Panels,
}

impl UiState {
    pub fn new(gfx: &GfxState, window: Arc<Window>) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gfx.device,
            gfx.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            panels: Panels::default(),
        }
    }

    pub fn draw(
        &mut self,
        window: &Window,
        sender: &mut UiEventSender,
        view: &UiView<'_>,
    ) -> egui::FullOutput {
        let raw_input = self.egui_state.take_egui_input(window);
        let panels = &mut self.panels;

        self.egui_ctx.run(raw_input, |ctx| {
            panels.draw(ctx, sender, view);
        })
    }
}
