use crate::config::ViewerConfig;
use crate::scene::Scene;
use anyhow::{Context as _, Result};
use lumen_input::{Action, ActionSet, CursorMode, FrameInput, InputState, process_input};
use lumen_render::{Camera, Renderer};
use lumen_render_gl::{GlContext, GlDevice};
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::KeyW => Some(Action::MoveForward),
        KeyCode::KeyS => Some(Action::MoveBackward),
        KeyCode::KeyA => Some(Action::StrafeLeft),
        KeyCode::KeyD => Some(Action::StrafeRight),
        KeyCode::Space => Some(Action::ToggleCursor),
        KeyCode::Escape => Some(Action::Quit),
        _ => None,
    }
}

fn apply_cursor_mode(window: &Window, mode: CursorMode) {
    let result = match mode {
        CursorMode::Captured => window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined)),
        CursorMode::Free => window.set_cursor_grab(CursorGrabMode::None),
    };
    if let Err(e) = result {
        tracing::warn!(?mode, "cursor grab failed: {e}");
    }
    window.set_cursor_visible(mode == CursorMode::Free);
}

/// Everything tied to the GL context. Field order is drop order: the
/// renderer frees its programs and textures while the context is alive.
struct Gpu {
    scene: Option<Scene<GlDevice>>,
    renderer: Renderer<GlDevice>,
    camera: Camera,
    context: GlContext,
}

impl Drop for Gpu {
    fn drop(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.release(&self.renderer);
        }
    }
}

/// Keys and cursor motion gathered between two frames.
#[derive(Debug, Default)]
struct PendingInput {
    held: ActionSet,
    pressed: ActionSet,
    /// Sum of raw mouse motion; only differences between frames matter.
    cursor: (f32, f32),
    moved: bool,
}

impl PendingInput {
    fn key(&mut self, action: Action, state: ElementState, repeat: bool) {
        let down = state == ElementState::Pressed;
        if down && !repeat && !self.held.contains(action) {
            self.pressed.insert(action);
        }
        self.held.set(action, down);
    }

    fn take_frame(&mut self, window_size: (u32, u32), dt: f32) -> FrameInput {
        let frame = FrameInput {
            held: self.held,
            pressed: self.pressed,
            cursor: self.moved.then_some(self.cursor),
            window_size,
            dt,
        };
        self.pressed.clear();
        self.moved = false;
        frame
    }
}

/// The viewer's event handler. Owns the window once the platform resumes.
pub struct ViewerApp {
    config: ViewerConfig,
    gpu: Option<Gpu>,
    input: InputState,
    pending: PendingInput,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        let input = InputState::new((config.window.width, config.window.height))
            .with_sensitivity(config.camera.sensitivity)
            .with_move_speed(config.camera.move_speed);
        Self {
            config,
            gpu: None,
            input,
            pending: PendingInput::default(),
            last_frame: Instant::now(),
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        self.gpu = None;
        event_loop.exit();
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let window = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(window.title.clone())
            .with_inner_size(PhysicalSize::new(window.width, window.height));
        let (context, gl) = GlContext::create(event_loop, attributes, window.vsync)
            .context("failed to create OpenGL window")?;

        let mut renderer = Renderer::new(GlDevice::new(gl));
        let scene = Scene::load(&mut renderer, &self.config)?;

        let (width, height) = context.size();
        let camera_config = &self.config.camera;
        let camera = Camera::perspective(
            camera_config.position,
            width,
            height,
            camera_config.near,
            camera_config.far,
            camera_config.fov_degrees.to_radians(),
        );

        Ok(Gpu {
            scene: Some(scene),
            renderer,
            camera,
            context,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let frame = self.pending.take_frame(gpu.context.size(), dt);
        let delta = process_input(&mut self.input, &frame);
        if delta.quit {
            tracing::info!("quit requested");
            event_loop.exit();
            return;
        }
        if let Some(mode) = delta.cursor_mode {
            apply_cursor_mode(gpu.context.window(), mode);
        }
        if let Some((width, height)) = delta.resized {
            gpu.context.resize(width, height);
            gpu.camera.update_window_size(width, height);
        }
        gpu.camera.set_direction(delta.direction);
        gpu.camera.translate(delta.translation);

        let (width, height) = self.input.window_size;
        gpu.renderer.begin_frame(width, height, self.config.clear_color.0);
        let drawn = match &gpu.scene {
            Some(scene) => scene.draw(&mut gpu.renderer, &gpu.camera),
            None => Ok(()),
        };
        if let Err(e) = drawn {
            self.fail(event_loop, anyhow::Error::new(e).context("frame failed"));
            return;
        }
        if let Err(e) = gpu.context.swap_buffers() {
            tracing::error!("swap failed: {e}");
        }
        gpu.context.window().request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(gpu) => {
                self.input.window_size = gpu.context.size();
                apply_cursor_mode(gpu.context.window(), self.input.cursor_mode());
                gpu.context.window().request_redraw();
                self.last_frame = Instant::now();
                self.gpu = Some(gpu);
                tracing::info!("viewer running; WASD to move, Space toggles cursor, Esc quits");
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if let Some(action) = action_for(key) {
                    self.pending.key(action, state, repeat);
                }
            }
            WindowEvent::Focused(false) => self.pending.held.clear(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.pending.cursor.0 += delta.0 as f32;
            self.pending.cursor.1 += delta.1 as f32;
            self.pending.moved = true;
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.gpu = None;
    }
}
