//! Application shell: window lifecycle and the per-frame loop
//!
//! One frame runs input application, camera update, view/projection push,
//! scene composition, and GPU submission, in that order. All mutable session
//! state lives in [`AppState`] and is only touched from winit's callbacks on
//! the event-loop thread.

use std::sync::Arc;
use std::time::Instant;

use cgmath::Point3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::config::ViewerConfig;
use crate::gfx::camera::{CameraController, FreeCamera};
use crate::gfx::rendering::{DrawList, RenderEngine};
use crate::gfx::scene::SceneComposer;
use crate::gfx::shading::ShaderState;
use crate::gfx::view::ViewFrame;
use crate::persist::{SceneStore, TelemetryThrottle};

const WINDOW_TITLE: &str = "deskview";

pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera: FreeCamera,
    controller: CameraController,
    view: ViewFrame,
    shader_state: ShaderState,
    composer: SceneComposer,
    draws: DrawList,
    store: SceneStore,
    telemetry: TelemetryThrottle,
    last_frame: Option<Instant>,
}

impl ViewerApp {
    /// Creates the application with the given configuration.
    pub fn new(config: ViewerConfig) -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let camera = FreeCamera::new(
            Point3::from(config.camera_position),
            config.camera_front.into(),
            config.camera_up.into(),
            config.default_zoom,
            config.movement_speed,
        );
        let view = ViewFrame::new(config.window_width, config.window_height);
        let store = SceneStore::open(&config.database_path);
        if !store.is_open() {
            log::warn!("continuing without session persistence");
        }

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                camera,
                controller: CameraController::new(),
                view,
                shader_state: ShaderState::new(),
                composer: SceneComposer::new(),
                draws: DrawList::new(),
                store,
                telemetry: TelemetryThrottle::new(),
                last_frame: None,
            },
        }
    }

    /// Runs the application (consumes self and starts the event loop).
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl AppState {
    /// Advances one frame: held keys, matrices, scene draw list, GPU submit,
    /// and the throttled telemetry write.
    fn render_frame(&mut self) {
        let now = Instant::now();
        let delta_time = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        self.controller
            .apply_held_keys(&mut self.camera, &mut self.view.mode, delta_time);

        self.view.push(&self.camera, &mut self.shader_state);

        self.draws.clear();
        self.composer
            .render(&mut self.shader_state, &mut self.draws);

        if let Some(engine) = self.render_engine.as_mut() {
            match engine.render(&self.draws, &self.composer.textures) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (width, height) = engine.surface_size();
                    engine.resize(width, height);
                }
                Err(err) => {
                    log::error!("frame dropped: {err}");
                    self.store.log_error("render", &err.to_string());
                }
            }
        }

        if delta_time > 0.0 && self.telemetry.tick(f64::from(delta_time)) {
            let frame_ms = f64::from(delta_time) * 1000.0;
            self.store.log_telemetry(1000.0 / frame_ms, frame_ms);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        if let Ok(window) = event_loop.create_window(attributes) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.view.resize(width, height);

            let engine = pollster::block_on(RenderEngine::new(window_handle, width, height));

            self.composer.prepare_tables(&mut self.shader_state);
            self.composer.load_textures(
                engine.device(),
                engine.queue(),
                engine.texture_layout(),
                &self.store,
            );

            self.render_engine = Some(engine);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                self.controller.handle_key(key_code, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.controller
                    .handle_cursor_moved(position.x, position.y, &mut self.camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y_offset = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                self.controller.handle_scroll(y_offset, &mut self.camera);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.view.resize(width, height);
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.store.save_camera_profile(
            "last_session",
            self.camera.position.x,
            self.camera.position.y,
            self.camera.position.z,
            self.camera.zoom,
            self.view.mode.store_name(),
        );

        self.composer.textures.release_all();
    }
}

// Keyboard state handling lives in CameraController; see its tests. The
// handler itself is exercised end-to-end by running the binary.
#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn element_state_maps_to_held_keys() {
        let mut controller = CameraController::new();
        controller.handle_key(winit::keyboard::KeyCode::KeyW, ElementState::Pressed);
        assert!(controller.is_held(winit::keyboard::KeyCode::KeyW));
        controller.handle_key(winit::keyboard::KeyCode::KeyW, ElementState::Released);
        assert!(!controller.is_held(winit::keyboard::KeyCode::KeyW));
    }
}
