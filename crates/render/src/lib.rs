//! Renderer core: resource tables, shader and texture resources, camera.
//!
//! # Invariants
//! - Handle 0 of every table is an inert sentinel and never names a resource.
//! - Tables are append-only; handles are never reused.
//! - Uniform writes and draws go through an [`ActiveShader`] session, so they
//!   always follow the activation of the program they target.
//!
//! The GPU is reached only through the [`GraphicsDevice`] trait. The OpenGL
//! implementation lives in `lumen-render-gl`; tests use a recording device.

mod camera;
mod device;
mod handle;
mod mesh;
mod renderer;
mod shader;
mod texture;

#[cfg(test)]
mod mock;

pub use camera::{Camera, Projection};
pub use device::{GraphicsDevice, ShaderStage, UniformValue};
pub use handle::{
    Handle, INVALID_ID, InvalidHandle, ResourceKind, ResourceTable, ShaderId, ShaderKind, Slot,
    TextureId, TextureKind,
};
pub use lumen_assets::ShaderSource;
pub use mesh::{MeshData, MeshError, Vertex, VertexAttribute};
pub use renderer::Renderer;
pub use shader::{ActiveShader, RendererId, ShaderError, ShaderRecord, UniformLocation};
pub use texture::{
    FilterMode, SamplerDesc, TextureError, TextureFormat, TextureRecord, TextureUpload, WrapMode,
};

pub fn crate_info() -> &'static str {
    "lumen-render v0.1.0"
}
