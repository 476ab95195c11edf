use crate::AssetError;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// An 8-bit image ready for upload, rows ordered bottom-to-top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Channels in `pixels`: always 3 (RGB) or 4 (RGBA).
    pub channels: u32,
    /// Channels in the file before conversion.
    pub source_channels: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }
}

/// Decode an image file with a vertical flip.
///
/// Grey and grey+alpha images are expanded to RGB and RGBA; 16-bit and float
/// samples are quantised to 8 bits. The renderer only accepts 3 or 4 channels,
/// so this is the single place where other layouts become uploadable.
pub fn decode_image(path: impl AsRef<Path>) -> Result<DecodedImage, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image_bytes(&bytes, path)
}

/// Decode an in-memory image. `label` is only used in errors and logs.
pub fn decode_image_bytes(
    bytes: &[u8],
    label: impl Into<PathBuf>,
) -> Result<DecodedImage, AssetError> {
    let label = label.into();
    let image = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        path: label.clone(),
        source,
    })?;
    let decoded = flip_and_normalise(image);
    tracing::debug!(
        path = %label.display(),
        width = decoded.width,
        height = decoded.height,
        channels = decoded.channels,
        source_channels = decoded.source_channels,
        "decoded image"
    );
    Ok(decoded)
}

fn flip_and_normalise(image: DynamicImage) -> DecodedImage {
    let color = image.color();
    let source_channels = u32::from(color.channel_count());
    let (width, height) = (image.width(), image.height());

    let (channels, pixels) = if color.has_alpha() {
        let mut rgba = image.into_rgba8();
        image::imageops::flip_vertical_in_place(&mut rgba);
        (4, rgba.into_raw())
    } else {
        let mut rgb = image.into_rgb8();
        image::imageops::flip_vertical_in_place(&mut rgb);
        (3, rgb.into_raw())
    };

    DecodedImage {
        width,
        height,
        channels,
        source_channels,
        pixels,
    }
}
