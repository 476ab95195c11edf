//! Asset loading for the renderer: shader source pairs and texture images.
//!
//! The renderer consumes decoded assets, never raw file handles. Everything in
//! this crate is read-only with respect to the filesystem.
//!
//! # Layout
//! - Shader pairs are two UTF-8 GLSL files (vertex + fragment), read fully.
//! - Images are decoded with a vertical flip so row 0 is the visual bottom,
//!   matching OpenGL's texture coordinate origin.

mod shader_source;
mod texture_image;

use std::path::PathBuf;

pub use shader_source::{ShaderSource, read_shader_pair};
pub use texture_image::{DecodedImage, decode_image, decode_image_bytes};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl AssetError {
    /// Path of the asset that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Decode { path, .. } => path,
        }
    }
}

pub fn crate_info() -> &'static str {
    "lumen-assets v0.1.0"
}
