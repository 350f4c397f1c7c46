use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to open image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("rgba buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

/// Decoded RGBA8 image, drawn scaled to whatever rect it is blitted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Bitmap {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(AssetError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(pixel)
    }

    /// Copy with row order reversed (top row becomes bottom row).
    pub fn flipped_vertical(&self) -> Bitmap {
        let row_len = self.width as usize * 4;
        let mut rgba = Vec::with_capacity(self.rgba.len());
        if row_len > 0 {
            for row in self.rgba.chunks_exact(row_len).rev() {
                rgba.extend_from_slice(row);
            }
        }
        Bitmap {
            width: self.width,
            height: self.height,
            rgba,
        }
    }
}

pub fn load_bitmap(path: &Path) -> Result<Bitmap, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(Bitmap {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
