//! Atlas image snapshots
//!
//! Row-major pixel buffers copied out of a glyph provider, ready for texture
//! upload. Row 0 is the top row of the image.

use std::path::Path;

use super::{GlyphError, GlyphResult};

/// Pixel snapshot of a glyph atlas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtlasImage {
    /// Raw pixel data, `width * height * channels` bytes
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of channels: 1 for coverage masks, 4 for RGBA
    pub channels: u8,
}

impl AtlasImage {
    /// Image with no pixels, returned for empty strings
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
            channels: 1,
        }
    }

    /// Single-channel coverage image filled with zero
    pub fn coverage(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize],
            width,
            height,
            channels: 1,
        }
    }

    /// Whether the image holds no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Bytes per image row
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Copy a tightly packed single-channel bitmap into this coverage image
    ///
    /// Pixels falling outside the image are dropped.
    pub fn blit_coverage(&mut self, bitmap: &[u8], bitmap_width: usize, left: u32, top: u32) {
        debug_assert_eq!(self.channels, 1);
        if bitmap_width == 0 {
            return;
        }

        let stride = self.row_stride();
        let left = left as usize;
        if left >= stride {
            return;
        }
        let copy_width = bitmap_width.min(stride - left);

        for (row, src) in bitmap.chunks_exact(bitmap_width).enumerate() {
            let y = top as usize + row;
            if y >= self.height as usize {
                break;
            }
            let dst = y * stride + left;
            self.data[dst..dst + copy_width].copy_from_slice(&src[..copy_width]);
        }
    }

    /// Copy of this image grown to `width` x `height`, existing pixels kept at
    /// the same positions
    #[must_use]
    pub fn grown(&self, width: u32, height: u32) -> Self {
        debug_assert!(width >= self.width && height >= self.height);
        let channels = self.channels as usize;
        let mut data = vec![0; width as usize * height as usize * channels];
        let old_stride = self.row_stride();
        let new_stride = width as usize * channels;

        for (row, src) in self.data.chunks_exact(old_stride.max(1)).enumerate() {
            let dst = row * new_stride;
            data[dst..dst + old_stride].copy_from_slice(src);
        }

        Self {
            data,
            width,
            height,
            channels: self.channels,
        }
    }

    /// Expand to RGBA, coverage going into alpha over white
    pub fn to_rgba(&self) -> Self {
        match self.channels {
            4 => self.clone(),
            1 => {
                let mut data = Vec::with_capacity(self.data.len() * 4);
                for &alpha in &self.data {
                    data.extend_from_slice(&[255, 255, 255, alpha]);
                }
                Self {
                    data,
                    width: self.width,
                    height: self.height,
                    channels: 4,
                }
            }
            other => {
                log::warn!("Unsupported atlas channel count {}, returning copy", other);
                self.clone()
            }
        }
    }

    /// Load an atlas image from a PNG or other supported file
    ///
    /// Grayscale images stay single-channel, everything else becomes RGBA.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GlyphResult<Self> {
        let path_ref = path.as_ref();

        log::debug!("Loading atlas image from: {:?}", path_ref);

        let img = image::open(path_ref)
            .map_err(|e| GlyphError::FontLoad(format!("Failed to load atlas image: {}", e)))?;

        let atlas = if img.color().channel_count() == 1 {
            let luma = img.to_luma8();
            let (width, height) = luma.dimensions();
            Self { data: luma.into_raw(), width, height, channels: 1 }
        } else {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self { data: rgba.into_raw(), width, height, channels: 4 }
        };

        log::info!("Loaded atlas image {}x{} from {:?}", atlas.width, atlas.height, path_ref);
        Ok(atlas)
    }

    /// Save the atlas as a PNG file for debugging
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        let color = if self.channels == 1 {
            image::ExtendedColorType::L8
        } else {
            image::ExtendedColorType::Rgba8
        };
        image::save_buffer_with_format(
            path.as_ref(),
            &self.data,
            self.width,
            self.height,
            color,
            image::ImageFormat::Png,
        )
    }
}
