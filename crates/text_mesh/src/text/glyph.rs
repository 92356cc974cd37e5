//! Glyph metrics and the provider seam
//!
//! A [`GlyphSource`] is anything that can describe glyphs at a pixel size and
//! hand out the atlas image those glyphs were packed into. The builder only
//! talks to fonts through this trait.

use serde::{Deserialize, Serialize};

use super::AtlasImage;

/// Result type for glyph provider operations
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Errors that can occur while querying a glyph provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlyphError {
    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// The font has no representation for the character
    #[error("Character {0:?} has no glyph")]
    MissingGlyph(char),

    /// The atlas page for this size cannot grow any further
    #[error("Glyph atlas for {size}px is full ({dim}x{dim})")]
    AtlasFull {
        /// Pixel size of the exhausted page
        size: u32,
        /// Current page dimension
        dim: u32,
    },

    /// No atlas image exists for the requested size
    #[error("No atlas image available for {0}px")]
    NoAtlas(u32),
}

/// Integer rectangle in atlas pixel coordinates (row 0 at the top)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasRect {
    /// Left edge in pixels
    pub left: u32,
    /// Top edge in pixels
    pub top: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl AtlasRect {
    /// Create a new rectangle
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self { left, top, width, height }
    }

    /// Exclusive right edge, saturating at `u32::MAX`
    pub const fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`
    pub const fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Whether the rectangle fits inside an image of the given size
    ///
    /// A rectangle whose edges overflow `u32` never fits.
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        match (self.left.checked_add(self.width), self.top.checked_add(self.height)) {
            (Some(right), Some(bottom)) => right <= width && bottom <= height,
            _ => false,
        }
    }
}

/// Metrics of one glyph at one pixel size
///
/// Bounds are in unscaled pixels relative to the pen origin on the baseline,
/// with y growing downward: ink above the baseline has a negative `bounds_top`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    /// Left edge of the ink box
    pub bounds_left: f32,
    /// Top edge of the ink box
    pub bounds_top: f32,
    /// Width of the ink box
    pub bounds_width: f32,
    /// Height of the ink box
    pub bounds_height: f32,
    /// Where the glyph's pixels live in the atlas
    pub atlas_rect: AtlasRect,
    /// Horizontal pen advance to the next glyph
    pub advance: f32,
}

impl GlyphMetrics {
    /// Whether the glyph has no ink (whitespace)
    pub fn is_empty(&self) -> bool {
        self.bounds_width <= 0.0 || self.bounds_height <= 0.0
    }

    /// Metrics with every pixel-space length multiplied by `factor`
    ///
    /// The atlas rectangle is left untouched.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            bounds_left: self.bounds_left * factor,
            bounds_top: self.bounds_top * factor,
            bounds_width: self.bounds_width * factor,
            bounds_height: self.bounds_height * factor,
            advance: self.advance * factor,
            ..self
        }
    }
}

/// Provider of glyph metrics, kerning, line spacing and atlas images
///
/// Querying a glyph may rasterize and pack it, so the query methods take
/// `&mut self`. Repeated queries with the same arguments must return the same
/// metrics as long as the atlas has not been resized in between.
///
/// Implementations are not required to be thread safe; share one provider
/// between threads only behind external synchronization.
pub trait GlyphSource {
    /// Metrics of `ch` at `size` pixels
    fn glyph(&mut self, ch: char, size: u32, bold: bool) -> GlyphResult<GlyphMetrics>;

    /// Horizontal kerning offset between `previous` and `next`
    fn kerning(&mut self, previous: char, next: char, size: u32) -> f32;

    /// Distance between two consecutive baselines
    fn line_spacing(&mut self, size: u32) -> f32;

    /// Snapshot of the atlas holding every glyph queried so far at `size`
    fn atlas_image(&self, size: u32) -> GlyphResult<AtlasImage>;
}

impl<S: GlyphSource + ?Sized> GlyphSource for &mut S {
    fn glyph(&mut self, ch: char, size: u32, bold: bool) -> GlyphResult<GlyphMetrics> {
        (**self).glyph(ch, size, bold)
    }

    fn kerning(&mut self, previous: char, next: char, size: u32) -> f32 {
        (**self).kerning(previous, next, size)
    }

    fn line_spacing(&mut self, size: u32) -> f32 {
        (**self).line_spacing(size)
    }

    fn atlas_image(&self, size: u32) -> GlyphResult<AtlasImage> {
        (**self).atlas_image(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atlas_rect_edges() {
        let rect = AtlasRect::new(10, 20, 5, 8);
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 28);
        assert!(rect.fits_within(15, 28));
        assert!(!rect.fits_within(14, 28));
    }

    #[test]
    fn test_atlas_rect_overflow_never_fits() {
        let rect = AtlasRect::new(u32::MAX, 0, 2, 2);
        assert_eq!(rect.right(), u32::MAX);
        assert!(!rect.fits_within(u32::MAX, u32::MAX));
        assert!(!AtlasRect::new(0, 1, 1, u32::MAX).fits_within(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_whitespace_is_empty() {
        let space = GlyphMetrics { advance: 9.0, ..Default::default() };
        assert!(space.is_empty());

        let ink = GlyphMetrics { bounds_width: 4.0, bounds_height: 6.0, ..space };
        assert!(!ink.is_empty());
    }

    #[test]
    fn test_scaled_keeps_atlas_rect() {
        let glyph = GlyphMetrics {
            bounds_left: 1.0,
            bounds_top: -10.0,
            bounds_width: 6.0,
            bounds_height: 10.0,
            atlas_rect: AtlasRect::new(3, 4, 6, 10),
            advance: 8.0,
        };

        let half = glyph.scaled(0.5);
        assert_eq!(half.bounds_top, -5.0);
        assert_eq!(half.advance, 4.0);
        assert_eq!(half.atlas_rect, glyph.atlas_rect);
    }
}
