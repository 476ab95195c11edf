use std::path::PathBuf;

/// Pixel layout used for both the GPU internal format and the upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgb8,
    Rgba8,
}

impl TextureFormat {
    /// 4 channels map to RGBA, 3 to RGB; nothing else is uploadable.
    pub fn from_channels(channels: u32) -> Option<Self> {
        match channels {
            3 => Some(Self::Rgb8),
            4 => Some(Self::Rgba8),
            _ => None,
        }
    }

    pub fn channels(self) -> u32 {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
    /// Linear within and between mip levels. Minification only.
    LinearMipmapLinear,
}

/// Sampling state applied at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub generate_mipmaps: bool,
}

impl Default for SamplerDesc {
    /// Mirrored repeat on both axes, trilinear minification, linear
    /// magnification, mipmaps generated.
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::MirroredRepeat,
            wrap_t: WrapMode::MirroredRepeat,
            min_filter: FilterMode::LinearMipmapLinear,
            mag_filter: FilterMode::Linear,
            generate_mipmaps: true,
        }
    }
}

/// Validated pixel data handed to the device.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub pixels: &'a [u8],
}

impl<'a> TextureUpload<'a> {
    /// Check dimensions, channel count and buffer length.
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        pixels: &'a [u8],
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage { width, height });
        }
        let format = TextureFormat::from_channels(channels)
            .ok_or(TextureError::UnsupportedChannelCount(channels))?;
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(TextureError::PixelDataLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }
}

/// Live texture slot contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRecord<T> {
    pub texture: T,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Errors from texture creation and lookup.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode texture {}", path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: lumen_assets::AssetError,
    },
    #[error("unsupported channel count {0}: expected 3 (RGB) or 4 (RGBA)")]
    UnsupportedChannelCount(u32),
    #[error("pixel buffer is {actual} bytes, expected {expected}")]
    PixelDataLength { expected: usize, actual: usize },
    #[error("texture has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("device failed to create texture: {0}")]
    Device(String),
}
