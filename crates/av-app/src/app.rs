use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::{WindowAttributes, WindowId};

use crate::events::AvEvent;
use crate::state::AppState;

pub struct App {
    event_loop_proxy: Arc<EventLoopProxy<AvEvent>>,
    state: Option<AppState>,
    needs_redraw: bool,
}

impl App {
    pub fn new(event_loop: &mut EventLoop<AvEvent>) -> Self {
        let event_loop_proxy = Arc::new(event_loop.create_proxy());

        Self {
            event_loop_proxy,
            state: None,
            needs_redraw: false,
        }
    }
}

impl ApplicationHandler<AvEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = WindowAttributes::default()
            .with_title("ArchiVision")
            .with_inner_size(winit::dpi::LogicalSize::new(1600.0, 900.0));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let state =
            pollster::block_on(AppState::new(window.clone(), self.event_loop_proxy.clone()))
                .unwrap();
        self.state = Some(state);
        self.needs_redraw = true;
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AvEvent) {
        if let Some(state) = &mut self.state {
            match event {
                AvEvent::Ui(e) => {
                    state.on_ui_event(e);
                }
                AvEvent::Net(e) => {
                    state.on_net_event(e);
                }
            }
            self.needs_redraw = true;
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if state.window.id() != window_id {
            return;
        }

        // Let egui handle the event first
        let response = state.ui.egui_state.on_window_event(&state.window, &event);

        if response.repaint {
            self.needs_redraw = true;
            state.window.request_redraw();
        }

        // Camera controls run even when egui consumed the event, as long as
        // the pointer is over the 3D view and not an egui widget
        let handle_camera_input = match &event {
            WindowEvent::MouseInput { .. }
            | WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseWheel { .. } => !state.ui.egui_ctx.is_pointer_over_area(),
            _ => false,
        };

        if !response.consumed || handle_camera_input {
            match event {
                WindowEvent::CloseRequested => {
                    event_loop.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    state.resize(physical_size);
                    self.needs_redraw = true;
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = state.render() {
                        log::error!("Render failed: {e}");
                    }
                    self.needs_redraw = false;
                }
                WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::MouseInput { .. } => {
                    state.input(&event);
                    self.needs_redraw = true;
                    state.window.request_redraw();
                }
                _ => {
                    state.input(&event);
                }
            }
        } else {
            match event {
                WindowEvent::CursorMoved { .. } | WindowEvent::MouseWheel { .. } => {
                    // a drag that started over the 3D view keeps orbiting even
                    // when the cursor crosses a panel
                    state.input(&event);
                    if state.mouse_dragging() {
                        self.needs_redraw = true;
                        state.window.request_redraw();
                    }
                }
                WindowEvent::MouseInput { .. } => {
                    // track button state even if egui consumed the click
                    state.input(&event);
                }
                _ => {}
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.needs_redraw {
            if let Some(state) = &self.state {
                state.window.request_redraw();
            }
        }
    }
}
