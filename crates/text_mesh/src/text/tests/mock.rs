//! Scripted glyph provider for layout tests

use std::cell::Cell;
use std::collections::HashMap;

use crate::text::{AtlasImage, AtlasRect, GlyphError, GlyphMetrics, GlyphResult, GlyphSource};

/// Fixed glyph table with query counters
#[derive(Debug, Default)]
pub struct MockFont {
    glyphs: HashMap<char, GlyphMetrics>,
    kerning: HashMap<(char, char), f32>,
    line_spacing: f32,
    atlas_size: (u32, u32),
    fail_atlas: bool,
    pub glyph_queries: usize,
    pub kerning_queries: usize,
    pub atlas_queries: Cell<usize>,
}

impl MockFont {
    /// 64x64 atlas, 50px line spacing, no glyphs
    pub fn new() -> Self {
        Self {
            line_spacing: 50.0,
            atlas_size: (64, 64),
            ..Self::default()
        }
    }

    /// Add a glyph whose ink starts at the pen and sits on the baseline
    pub fn with_glyph(
        mut self,
        ch: char,
        width: u32,
        height: u32,
        advance: f32,
        atlas_left: u32,
    ) -> Self {
        self.glyphs.insert(
            ch,
            GlyphMetrics {
                bounds_left: 0.0,
                bounds_top: -(height as f32),
                bounds_width: width as f32,
                bounds_height: height as f32,
                atlas_rect: AtlasRect::new(atlas_left, 0, width, height),
                advance,
            },
        );
        self
    }

    /// Add a glyph with no ink
    pub fn with_blank(mut self, ch: char, advance: f32) -> Self {
        self.glyphs.insert(ch, GlyphMetrics { advance, ..GlyphMetrics::default() });
        self
    }

    pub fn with_kerning(mut self, previous: char, next: char, offset: f32) -> Self {
        self.kerning.insert((previous, next), offset);
        self
    }

    pub fn with_line_spacing(mut self, line_spacing: f32) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    pub fn failing_atlas(mut self) -> Self {
        self.fail_atlas = true;
        self
    }
}

impl GlyphSource for MockFont {
    fn glyph(&mut self, ch: char, _size: u32, _bold: bool) -> GlyphResult<GlyphMetrics> {
        self.glyph_queries += 1;
        self.glyphs.get(&ch).copied().ok_or(GlyphError::MissingGlyph(ch))
    }

    fn kerning(&mut self, previous: char, next: char, _size: u32) -> f32 {
        self.kerning_queries += 1;
        self.kerning.get(&(previous, next)).copied().unwrap_or(0.0)
    }

    fn line_spacing(&mut self, _size: u32) -> f32 {
        self.line_spacing
    }

    fn atlas_image(&self, size: u32) -> GlyphResult<AtlasImage> {
        self.atlas_queries.set(self.atlas_queries.get() + 1);
        if self.fail_atlas {
            return Err(GlyphError::NoAtlas(size));
        }
        Ok(AtlasImage::coverage(self.atlas_size.0, self.atlas_size.1))
    }
}

/// The "Hi" font: H advances 40, i advances 20, kerning(H, i) = -2
pub fn hi_font() -> MockFont {
    MockFont::new()
        .with_glyph('H', 30, 40, 40.0, 0)
        .with_glyph('i', 10, 40, 20.0, 32)
        .with_kerning('H', 'i', -2.0)
}

/// Four capitals, a space and a question mark
pub fn abcd_font() -> MockFont {
    MockFont::new()
        .with_glyph('A', 20, 30, 24.0, 0)
        .with_glyph('B', 18, 30, 22.0, 20)
        .with_glyph('C', 18, 30, 22.0, 38)
        .with_glyph('D', 20, 30, 24.0, 0)
        .with_glyph('V', 20, 30, 24.0, 20)
        .with_glyph('?', 12, 30, 16.0, 40)
        .with_blank(' ', 12.0)
}
