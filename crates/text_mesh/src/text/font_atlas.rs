//! Font atlas system for text rendering
//!
//! This module provides font loading, lazy glyph rasterization and atlas
//! packing using the `fontdue` library for pure Rust font rendering. Every
//! pixel size gets its own atlas page; glyphs are rasterized the first time
//! they are queried.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings};
use serde::{Deserialize, Serialize};

use super::{AtlasImage, AtlasRect, GlyphError, GlyphMetrics, GlyphResult, GlyphSource, ShelfPacker};
use crate::config::{Config, ConfigError};

/// Sizing of the atlas pages created by a [`FontAtlas`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontAtlasSettings {
    /// Width and height of a freshly created page
    pub initial_dim: u32,
    /// Largest width and height a page may grow to
    pub max_dim: u32,
    /// Empty pixels kept around every glyph
    pub gutter: u32,
}

impl Default for FontAtlasSettings {
    fn default() -> Self {
        Self {
            initial_dim: 128,
            max_dim: 4096,
            gutter: 2,
        }
    }
}

impl FontAtlasSettings {
    /// Validate the page sizes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_dim == 0 {
            return Err(ConfigError::Invalid("initial_dim must be positive".to_string()));
        }

        if self.max_dim < self.initial_dim {
            return Err(ConfigError::Invalid(format!(
                "max_dim ({}) must not be smaller than initial_dim ({})",
                self.max_dim, self.initial_dim
            )));
        }

        Ok(())
    }
}

impl Config for FontAtlasSettings {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    ch: char,
    bold: bool,
}

/// Packed glyphs for a single pixel size
#[derive(Debug, Clone)]
struct AtlasPage {
    image: AtlasImage,
    packer: ShelfPacker,
    glyphs: HashMap<GlyphKey, GlyphMetrics>,
}

impl AtlasPage {
    fn new(settings: &FontAtlasSettings) -> Self {
        let dim = settings.initial_dim;
        Self {
            image: AtlasImage::coverage(dim, dim),
            packer: ShelfPacker::new(dim, dim, settings.gutter),
            glyphs: HashMap::new(),
        }
    }

    /// Reserve room for a bitmap, doubling the page until it fits
    fn allocate(
        &mut self,
        width: u32,
        height: u32,
        size: u32,
        max_dim: u32,
    ) -> GlyphResult<AtlasRect> {
        loop {
            if let Some(rect) = self.packer.allocate(width, height) {
                return Ok(rect);
            }

            let (current_width, current_height) = self.packer.dimensions();
            let new_width = current_width.saturating_mul(2).min(max_dim);
            let new_height = current_height.saturating_mul(2).min(max_dim);
            let grows = new_width >= current_width
                && new_height >= current_height
                && (new_width, new_height) != (current_width, current_height);
            if !grows {
                return Err(GlyphError::AtlasFull { size, dim: current_width });
            }

            log::info!(
                "Growing {}px glyph atlas from {}x{} to {}x{}",
                size, current_width, current_height, new_width, new_height
            );
            self.image = self.image.grown(new_width, new_height);
            self.packer.grow(new_width, new_height);
        }
    }
}

/// Lazily rasterizing glyph provider backed by a TrueType/OpenType font
///
/// Glyph metrics stay valid for the lifetime of the atlas, but a page that
/// grows changes its dimensions, so take the atlas image only after every
/// glyph of a string has been queried.
pub struct FontAtlas {
    /// Underlying fontdue font
    regular: Font,
    /// Optional bold face
    bold: Option<Font>,
    /// One page per pixel size
    pages: HashMap<u32, AtlasPage>,
    settings: FontAtlasSettings,
}

impl FontAtlas {
    /// Create a new font atlas from TrueType/OpenType font data
    ///
    /// # Example
    ///
    /// ```no_run
    /// use text_mesh::text::FontAtlas;
    ///
    /// let font_bytes = std::fs::read("res/Montserrat-Bold.ttf").unwrap();
    /// let atlas = FontAtlas::new(&font_bytes).unwrap();
    /// ```
    pub fn new(font_data: &[u8]) -> GlyphResult<Self> {
        let regular = load_face(font_data)?;

        log::info!("Loaded font '{}'", regular.name().unwrap_or("unnamed"));

        Ok(Self {
            regular,
            bold: None,
            pages: HashMap::new(),
            settings: FontAtlasSettings::default(),
        })
    }

    /// Load the regular face from a font file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GlyphResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| GlyphError::FontLoad(format!("{}: {}", path.display(), e)))?;
        Self::new(&bytes)
    }

    /// Add a bold face used for bold glyph requests
    ///
    /// Without one, bold requests are served from the regular face. Kerning
    /// and line spacing always come from the regular face, bold or not.
    pub fn with_bold_face(mut self, font_data: &[u8]) -> GlyphResult<Self> {
        self.bold = Some(load_face(font_data)?);
        Ok(self)
    }

    /// Replace the page sizing settings
    ///
    /// Only affects pages created afterwards. Fails if the settings do not
    /// validate.
    pub fn with_settings(mut self, settings: FontAtlasSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// Rasterize all printable ASCII glyphs at `size`
    ///
    /// Characters the font lacks are skipped.
    pub fn rasterize_ascii(&mut self, size: u32, bold: bool) -> GlyphResult<usize> {
        let mut count = 0;
        for ch in ' '..='~' {
            match self.glyph(ch, size, bold) {
                Ok(_) => count += 1,
                Err(GlyphError::MissingGlyph(_)) => {}
                Err(e) => return Err(e),
            }
        }

        log::info!("Glyph cache populated: {} glyphs at {}px", count, size);
        Ok(count)
    }

    /// Dimensions of the page for `size`, if one exists
    pub fn page_dimensions(&self, size: u32) -> Option<(u32, u32)> {
        self.pages.get(&size).map(|page| page.packer.dimensions())
    }

    /// Number of glyphs cached for `size`
    pub fn cached_glyph_count(&self, size: u32) -> usize {
        self.pages.get(&size).map_or(0, |page| page.glyphs.len())
    }

    fn face(&self, bold: bool) -> &Font {
        match (&self.bold, bold) {
            (Some(face), true) => face,
            _ => &self.regular,
        }
    }
}

impl GlyphSource for FontAtlas {
    fn glyph(&mut self, ch: char, size: u32, bold: bool) -> GlyphResult<GlyphMetrics> {
        let key = GlyphKey { ch, bold };
        if let Some(metrics) = self.pages.get(&size).and_then(|page| page.glyphs.get(&key)) {
            return Ok(*metrics);
        }

        // The page exists even if every glyph turns out missing, so the atlas
        // image for this size can always be taken.
        let settings = self.settings;
        self.pages.entry(size).or_insert_with(|| AtlasPage::new(&settings));

        let face = self.face(bold);
        if face.lookup_glyph_index(ch) == 0 {
            return Err(GlyphError::MissingGlyph(ch));
        }
        let (raster, bitmap) = face.rasterize(ch, size as f32);

        let page = self.pages.entry(size).or_insert_with(|| AtlasPage::new(&settings));

        let (width, height) = (raster.width as u32, raster.height as u32);
        let atlas_rect = if width == 0 || height == 0 {
            AtlasRect::default()
        } else {
            let rect = page.allocate(width, height, size, settings.max_dim)?;
            page.image.blit_coverage(&bitmap, raster.width, rect.left, rect.top);
            rect
        };

        // fontdue reports ymin upward from the baseline; glyph space grows downward.
        let metrics = GlyphMetrics {
            bounds_left: raster.xmin as f32,
            bounds_top: -(raster.ymin as f32 + height as f32),
            bounds_width: width as f32,
            bounds_height: height as f32,
            atlas_rect,
            advance: raster.advance_width,
        };

        page.glyphs.insert(key, metrics);
        Ok(metrics)
    }

    fn kerning(&mut self, previous: char, next: char, size: u32) -> f32 {
        self.regular
            .horizontal_kern(previous, next, size as f32)
            .unwrap_or(0.0)
    }

    fn line_spacing(&mut self, size: u32) -> f32 {
        let px = size as f32;
        self.regular
            .horizontal_line_metrics(px)
            .map_or(px * 1.2, |metrics| metrics.new_line_size)
    }

    fn atlas_image(&self, size: u32) -> GlyphResult<AtlasImage> {
        self.pages
            .get(&size)
            .map(|page| page.image.clone())
            .ok_or(GlyphError::NoAtlas(size))
    }
}

fn load_face(font_data: &[u8]) -> GlyphResult<Font> {
    Font::from_bytes(font_data, FontSettings::default())
        .map_err(|e| GlyphError::FontLoad(format!("fontdue error: {}", e)))
}
