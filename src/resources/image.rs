//! Pixel data for textures.

use std::path::Path;

use anyhow::{Context, bail};

/// Decoded 8-bit RGBA pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> anyhow::Result<Self> {
        if width == 0 || height == 0 {
            bail!("image has no pixels ({width}x{height})");
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            bail!(
                "{width}x{height} RGBA image needs {expected} bytes, got {}",
                pixels.len()
            );
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Provides the pixels of an image file.
pub trait ImageSource {
    fn load_rgba(&self, path: &Path) -> anyhow::Result<PixelBuffer>;
}

/// Reads and decodes images from the filesystem with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn load_rgba(&self, path: &Path) -> anyhow::Result<PixelBuffer> {
        let img = image::open(path).with_context(|| format!("could not decode {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        PixelBuffer::new(width, height, rgba.into_raw())
    }
}
