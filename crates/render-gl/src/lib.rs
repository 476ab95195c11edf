//! OpenGL backend for the renderer core.
//!
//! [`GlContext`] owns the window and a current 3.3 core context;
//! [`GlDevice`] implements [`lumen_render::GraphicsDevice`] on top of glow.
//!
//! # Invariants
//! - All device calls happen on the thread the context is current on.
//! - The `Renderer` owning a [`GlDevice`] is dropped before its [`GlContext`].

mod context;
mod device;

pub use context::{ContextError, GL_VERSION, GlContext};
pub use device::{GlDevice, GlMesh};

pub fn crate_info() -> &'static str {
    "lumen-render-gl v0.1.0"
}
