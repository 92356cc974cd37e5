//! Pre-baked bitmap fonts
//!
//! A baked font is an atlas image rasterized ahead of time plus a table of
//! glyph metrics, kerning pairs and line spacing authored at one native pixel
//! size. Requests at other sizes scale the metrics; the atlas stays the same.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AtlasImage, GlyphError, GlyphMetrics, GlyphResult, GlyphSource};
use crate::config::Config;

/// Serializable description of a baked font
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BakedFontDescription {
    /// Pixel size the metrics were authored at
    pub native_size: u32,
    /// Baseline-to-baseline distance at the native size
    pub line_spacing: f32,
    /// Glyph table
    pub glyphs: HashMap<char, GlyphMetrics>,
    /// Kerning pairs `(previous, next, offset)` at the native size
    #[serde(default)]
    pub kerning: Vec<(char, char, f32)>,
}

impl Config for BakedFontDescription {}

/// Glyph provider over a fixed, pre-rasterized atlas
#[derive(Debug, Clone)]
pub struct BakedFont {
    native_size: u32,
    line_spacing: f32,
    glyphs: HashMap<char, GlyphMetrics>,
    kerning: HashMap<(char, char), f32>,
    image: AtlasImage,
}

impl BakedFont {
    /// Combine a description with its atlas image
    ///
    /// Fails when a glyph's atlas rectangle lies outside the image.
    pub fn new(description: BakedFontDescription, image: AtlasImage) -> GlyphResult<Self> {
        if description.native_size == 0 {
            return Err(GlyphError::FontLoad("baked font native size must be positive".to_string()));
        }

        if let Some((ch, _)) = description
            .glyphs
            .iter()
            .find(|(_, glyph)| !glyph.atlas_rect.fits_within(image.width, image.height))
        {
            return Err(GlyphError::FontLoad(format!(
                "glyph {:?} lies outside the {}x{} atlas",
                ch, image.width, image.height
            )));
        }

        let kerning = description
            .kerning
            .iter()
            .map(|&(previous, next, offset)| ((previous, next), offset))
            .collect();

        Ok(Self {
            native_size: description.native_size,
            line_spacing: description.line_spacing,
            glyphs: description.glyphs,
            kerning,
            image,
        })
    }

    /// Load a description (`.ron` or `.toml`) and its atlas image
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        description_path: P,
        image_path: Q,
    ) -> GlyphResult<Self> {
        let description = BakedFontDescription::load_from_file(description_path.as_ref())
            .map_err(|e| GlyphError::FontLoad(e.to_string()))?;
        let image = AtlasImage::from_file(image_path)?;

        log::info!(
            "Loaded baked font with {} glyphs at {}px",
            description.glyphs.len(),
            description.native_size
        );

        Self::new(description, image)
    }

    /// Pixel size the metrics were authored at
    pub fn native_size(&self) -> u32 {
        self.native_size
    }

    fn scale_for(&self, size: u32) -> f32 {
        size as f32 / self.native_size as f32
    }
}

impl GlyphSource for BakedFont {
    fn glyph(&mut self, ch: char, size: u32, _bold: bool) -> GlyphResult<GlyphMetrics> {
        self.glyphs
            .get(&ch)
            .map(|glyph| glyph.scaled(self.scale_for(size)))
            .ok_or(GlyphError::MissingGlyph(ch))
    }

    fn kerning(&mut self, previous: char, next: char, size: u32) -> f32 {
        self.kerning
            .get(&(previous, next))
            .map_or(0.0, |offset| offset * self.scale_for(size))
    }

    fn line_spacing(&mut self, size: u32) -> f32 {
        self.line_spacing * self.scale_for(size)
    }

    fn atlas_image(&self, _size: u32) -> GlyphResult<AtlasImage> {
        Ok(self.image.clone())
    }
}
