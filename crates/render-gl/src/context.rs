use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use std::num::NonZeroU32;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

/// OpenGL version requested from the driver (core profile).
pub const GL_VERSION: (u8, u8) = (3, 3);

/// Failure to bring up a window with a current GL context.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to create display: {0}")]
    Display(String),
    #[error("display builder returned no window")]
    NoWindow,
    #[error("window handle unavailable: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
    #[error("OpenGL context error: {0}")]
    Gl(#[from] glutin::error::Error),
}

/// A window with a current OpenGL 3.3 core context and its surface.
///
/// Fields drop in declaration order: surface, then context, then window.
pub struct GlContext {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

/// Prefer a config without multisampling, which every driver offers.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, config| {
            if config.num_samples() < best.num_samples() {
                config
            } else {
                best
            }
        })
        .expect("glutin offers at least one config for a valid display")
}

impl GlContext {
    /// Create the window, make a context current on it, and load GL entry
    /// points. The returned loader is only valid while `self` is alive.
    pub fn create(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
        vsync: bool,
    ) -> Result<(Self, glow::Context), ContextError> {
        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, pick_config)
            .map_err(|e| ContextError::Display(e.to_string()))?;
        let window = window.ok_or(ContextError::NoWindow)?;

        let raw_handle = window.window_handle()?.as_raw();
        let display = config.display();
        let (major, minor) = GL_VERSION;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));
        let not_current = unsafe { display.create_context(&config, &context_attributes)? };

        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            tracing::warn!("could not set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| {
                display.get_proc_address(symbol) as *const _
            })
        };
        tracing::info!(
            samples = config.num_samples(),
            depth = config.depth_size(),
            "GL context created"
        );

        Ok((
            Self {
                surface,
                context,
                window,
            },
            gl,
        ))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Window size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Resize the surface. Zero-sized (minimised) windows are ignored.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    pub fn swap_buffers(&self) -> Result<(), ContextError> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}
