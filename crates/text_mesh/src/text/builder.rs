//! Text mesh builder
//!
//! Entry point of the crate: validates a [`TextMeshConfig`] once, then turns
//! `(glyph source, string, pixel size)` into a [`TextMesh`].

use serde::{Deserialize, Serialize};

use super::{
    GlyphError, GlyphQuadEmitter, GlyphSource, GlyphTable, LineLayoutWalker, MeshAssembler,
    TexCoordOrigin, TextMesh, VerticalOffsetTable, YAxis,
};
use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec2;

/// Errors that can occur while building a text mesh
#[derive(Debug, thiserror::Error)]
pub enum TextMeshError {
    /// The provider could not produce the atlas image the mesh samples
    #[error("Failed to extract the {size}px atlas image: {source}")]
    AtlasExtraction {
        /// Requested pixel size
        size: u32,
        /// Provider error
        source: GlyphError,
    },

    /// The configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What to draw for characters the provider has no glyph for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingGlyphPolicy {
    /// Character drawn in place of a missing one
    pub substitute: Option<char>,
    /// Pen advance, as a fraction of the pixel size, when nothing is drawn
    pub fallback_advance: f32,
}

impl Default for MissingGlyphPolicy {
    fn default() -> Self {
        Self {
            substitute: Some('?'),
            fallback_advance: 0.5,
        }
    }
}

/// Text mesh configuration
///
/// Loadable from TOML or RON through [`Config`]; missing fields take their
/// default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMeshConfig {
    /// Pixels added on every side of each quad and its atlas rectangle
    pub padding: f32,
    /// Every emitted position is divided by this
    pub scale_divisor: f32,
    /// Pen start position
    pub origin: [f32; 2],
    /// Direction lines advance in
    pub y_axis: YAxis,
    /// Row texture coordinate `v = 0` refers to
    pub tex_origin: TexCoordOrigin,
    /// Shift every glyph by `height - max_height` so mixed-height glyphs
    /// share a line
    pub baseline_normalization: bool,
    /// Query kerning against a following line break even though the line
    /// break discards it; only matters for providers with side effects
    pub query_kerning_before_newline: bool,
    /// Request bold glyphs
    pub bold: bool,
    /// Fallback for characters the provider lacks
    pub missing_glyph: MissingGlyphPolicy,
    /// Per-character-class vertical corrections
    pub vertical_offsets: VerticalOffsetTable,
}

impl Default for TextMeshConfig {
    fn default() -> Self {
        Self {
            padding: 1.0,
            scale_divisor: 1.0,
            origin: [0.0, 0.0],
            y_axis: YAxis::Down,
            tex_origin: TexCoordOrigin::TopLeft,
            baseline_normalization: false,
            query_kerning_before_newline: false,
            bold: false,
            missing_glyph: MissingGlyphPolicy::default(),
            vertical_offsets: VerticalOffsetTable::new(),
        }
    }
}

impl TextMeshConfig {
    /// Set the quad padding
    #[must_use]
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the position scale divisor
    #[must_use]
    pub fn with_scale_divisor(mut self, scale_divisor: f32) -> Self {
        self.scale_divisor = scale_divisor;
        self
    }

    /// Set the pen origin
    #[must_use]
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = [x, y];
        self
    }

    /// Set both coordinate conventions
    #[must_use]
    pub fn with_conventions(mut self, y_axis: YAxis, tex_origin: TexCoordOrigin) -> Self {
        self.y_axis = y_axis;
        self.tex_origin = tex_origin;
        self
    }

    /// Enable or disable baseline normalization
    #[must_use]
    pub fn with_baseline_normalization(mut self, enabled: bool) -> Self {
        self.baseline_normalization = enabled;
        self
    }

    /// Request bold glyphs
    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the vertical offset table
    #[must_use]
    pub fn with_vertical_offsets(mut self, table: VerticalOffsetTable) -> Self {
        self.vertical_offsets = table;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "padding must be finite and >= 0, got {}",
                self.padding
            )));
        }

        if !self.scale_divisor.is_finite() || self.scale_divisor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scale_divisor must be finite and > 0, got {}",
                self.scale_divisor
            )));
        }

        if !self.origin.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "origin must be finite, got {:?}",
                self.origin
            )));
        }

        let fallback = self.missing_glyph.fallback_advance;
        if !fallback.is_finite() || fallback < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "missing_glyph.fallback_advance must be finite and >= 0, got {}",
                fallback
            )));
        }

        Ok(())
    }
}

impl Config for TextMeshConfig {}

/// Builds text meshes from any [`GlyphSource`]
///
/// The builder holds only its configuration, so one instance can serve any
/// number of providers and threads.
///
/// # Example
///
/// ```no_run
/// use text_mesh::text::{FontAtlas, TextMeshBuilder, TextMeshConfig};
///
/// let mut font = FontAtlas::from_file("res/Montserrat-Bold.ttf").unwrap();
/// let builder = TextMeshBuilder::new(TextMeshConfig::default()).unwrap();
/// let mesh = builder.build(&mut font, "Hello world\n", 64).unwrap();
/// assert_eq!(mesh.indices().len(), 10 * 6);
/// ```
#[derive(Debug, Clone)]
pub struct TextMeshBuilder {
    config: TextMeshConfig,
    emitter: GlyphQuadEmitter,
}

impl TextMeshBuilder {
    /// Create a builder, rejecting invalid configurations
    pub fn new(config: TextMeshConfig) -> Result<Self, TextMeshError> {
        config.validate()?;
        let emitter = GlyphQuadEmitter::new(&config);
        Ok(Self { config, emitter })
    }

    /// The configuration this builder was created with
    pub fn config(&self) -> &TextMeshConfig {
        &self.config
    }

    /// Lay out `text` at `size` pixels
    ///
    /// Every distinct character is queried before the atlas image is taken,
    /// so the image contains every glyph the mesh references. Characters the
    /// provider lacks are handled by the configured [`MissingGlyphPolicy`];
    /// only a failure to produce the atlas image is returned as an error.
    pub fn build<S: GlyphSource + ?Sized>(
        &self,
        source: &mut S,
        text: &str,
        size: u32,
    ) -> Result<TextMesh, TextMeshError> {
        if text.is_empty() {
            return Ok(TextMesh::empty());
        }

        let config = &self.config;
        let glyphs = GlyphTable::resolve(source, text, size, config.bold, &config.missing_glyph);
        if glyphs.is_empty() {
            // Nothing but line breaks.
            return Ok(TextMesh::empty());
        }

        let atlas = source
            .atlas_image(size)
            .map_err(|source| TextMeshError::AtlasExtraction { size, source })?;

        let walker = LineLayoutWalker::new(
            &self.emitter,
            Vec2::new(config.origin[0], config.origin[1]),
            config.y_axis,
            config.query_kerning_before_newline,
        );
        let mut mesh = MeshAssembler::with_capacity(text.len());
        let atlas_size = (atlas.width, atlas.height);
        let summary = walker.walk(source, &glyphs, text, size, atlas_size, &mut mesh);

        log::debug!(
            "Built text mesh at {}px: {} glyphs on {} lines, {} distinct characters, atlas {}x{}",
            size,
            mesh.quad_count(),
            summary.lines,
            glyphs.len(),
            atlas.width,
            atlas.height
        );

        Ok(mesh.finalize(atlas))
    }
}
