//! Text mesh generation
//!
//! Turns a string into a renderable mesh of textured quads sampling a glyph
//! atlas image.
//!
//! # Architecture
//!
//! - [`GlyphSource`]: glyph metrics, kerning, line spacing and atlas images
//!   ([`FontAtlas`] rasterizes TTF/OTF fonts lazily, [`BakedFont`] serves a
//!   pre-baked atlas)
//! - [`GlyphTable`]: one query per distinct character, missing glyphs resolved
//!   through [`MissingGlyphPolicy`]
//! - [`LineLayoutWalker`]: pen walk applying kerning and line breaks
//! - [`GlyphQuadEmitter`]: padded, normalized quads with atlas UVs
//! - [`MeshAssembler`]: accumulates quads into a [`TextMesh`]
//! - [`TextMeshBuilder`]: ties it all together
//! - [`TextLabel`]: retained text with a cached mesh and model matrix
//!
//! # Example
//!
//! ```no_run
//! use text_mesh::text::{FontAtlas, TextMeshBuilder, TextMeshConfig};
//!
//! let mut font = FontAtlas::from_file("res/Montserrat-Bold.ttf")?;
//! let builder = TextMeshBuilder::new(TextMeshConfig::default())?;
//!
//! let mesh = builder.build(&mut font, "Hello world\n", 256)?;
//! println!("{} glyphs, atlas {}x{}", mesh.glyph_count(), mesh.atlas().width, mesh.atlas().height);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod atlas_image;
mod atlas_packer;
mod baked_font;
mod builder;
mod convention;
mod font_atlas;
mod glyph;
mod label;
mod layout;
mod mesh;
mod quad;
mod vertical_offsets;

#[cfg(test)]
mod tests;

pub use atlas_image::AtlasImage;
pub use atlas_packer::ShelfPacker;
pub use baked_font::{BakedFont, BakedFontDescription};
pub use builder::{MissingGlyphPolicy, TextMeshBuilder, TextMeshConfig, TextMeshError};
pub use convention::{TexCoordOrigin, YAxis};
pub use font_atlas::{FontAtlas, FontAtlasSettings};
pub use glyph::{AtlasRect, GlyphError, GlyphMetrics, GlyphResult, GlyphSource};
pub use label::TextLabel;
pub use layout::{
    GlyphPlacement, GlyphTable, LayoutSummary, LineLayoutWalker, PenPosition, ResolvedGlyph,
};
pub use mesh::{MeshAssembler, TextBounds, TextMesh, TextVertex};
pub use quad::GlyphQuadEmitter;
pub use vertical_offsets::{CharClass, OffsetBasis, VerticalOffsetRule, VerticalOffsetTable};
