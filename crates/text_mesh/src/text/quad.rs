//! Glyph quad emission
//!
//! Turns one glyph's metrics at one pen position into four vertices, four
//! texture coordinates and two triangles.

use super::{
    GlyphMetrics, MeshAssembler, TexCoordOrigin, TextMeshConfig, VerticalOffsetTable, YAxis,
};
use crate::foundation::math::Vec2;

/// Converts glyph metrics into textured quads
///
/// All settings are fixed at construction so every glyph of a mesh is
/// emitted under the same padding, scale and conventions.
#[derive(Debug, Clone)]
pub struct GlyphQuadEmitter {
    padding: f32,
    scale_divisor: f32,
    baseline_normalization: bool,
    y_axis: YAxis,
    tex_origin: TexCoordOrigin,
    vertical_offsets: VerticalOffsetTable,
}

impl GlyphQuadEmitter {
    /// Create an emitter from a validated configuration
    pub fn new(config: &TextMeshConfig) -> Self {
        Self {
            padding: config.padding,
            scale_divisor: config.scale_divisor,
            baseline_normalization: config.baseline_normalization,
            y_axis: config.y_axis,
            tex_origin: config.tex_origin,
            vertical_offsets: config.vertical_offsets.clone(),
        }
    }

    /// Emit the quad for `glyph` with its origin at `pen`
    ///
    /// `atlas_size` is the size of the atlas image the mesh will sample and
    /// `line_max_height` the tallest glyph height in the string. Glyphs with
    /// no ink emit nothing; returns whether a quad was appended.
    pub fn emit(
        &self,
        mesh: &mut MeshAssembler,
        ch: char,
        glyph: &GlyphMetrics,
        pen: Vec2,
        atlas_size: (u32, u32),
        line_max_height: f32,
    ) -> bool {
        if glyph.is_empty() {
            return false;
        }

        let (atlas_width, atlas_height) = atlas_size;
        debug_assert!(atlas_width > 0 && atlas_height > 0, "glyph with ink but empty atlas");

        let pad = self.padding;

        let left = glyph.bounds_left - pad;
        let right = glyph.bounds_left + glyph.bounds_width + pad;
        let mut top = glyph.bounds_top - pad;
        let mut bottom = glyph.bounds_top + glyph.bounds_height + pad;

        let mut shift = self
            .vertical_offsets
            .offset_for(ch, glyph.bounds_height, line_max_height);
        if self.baseline_normalization {
            shift += glyph.bounds_height - line_max_height;
        }
        top += shift;
        bottom += shift;

        let x = |offset: f32| (pen.x + offset) / self.scale_divisor;
        let y = |offset: f32| (pen.y + self.y_axis.offset(offset)) / self.scale_divisor;
        let (x1, x2, y1, y2) = (x(left), x(right), y(top), y(bottom));

        let rect = glyph.atlas_rect;
        let (width, height) = (atlas_width as f32, atlas_height as f32);
        let u1 = (rect.left as f32 - pad) / width;
        let u2 = (rect.right() as f32 + pad) / width;
        let v1 = self.tex_origin.v((rect.top as f32 - pad) / height);
        let v2 = self.tex_origin.v((rect.bottom() as f32 + pad) / height);

        mesh.append_quad(
            [[x1, y1], [x2, y1], [x2, y2], [x1, y2]],
            [[u1, v1], [u2, v1], [u2, v2], [u1, v2]],
        );
        true
    }
}
