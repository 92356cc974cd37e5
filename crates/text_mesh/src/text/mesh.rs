//! Text mesh buffers
//!
//! [`MeshAssembler`] is the append-only accumulator the quad emitter writes
//! into; [`TextMesh`] is the finished artifact handed to a renderer.

use bytemuck::{Pod, Zeroable};

use super::AtlasImage;

/// Vertex data for interleaved text rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TextVertex {
    /// Position in mesh space
    pub position: [f32; 2],
    /// UV texture coordinates
    pub tex_coord: [f32; 2],
}

/// Bounding box for text layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl TextBounds {
    /// Calculate width of bounding box
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Calculate height of bounding box
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Append-only accumulator of glyph quads
#[derive(Debug, Default)]
pub struct MeshAssembler {
    vertices: Vec<[f32; 2]>,
    tex_coords: Vec<[f32; 2]>,
    indices: Vec<u32>,
    vertex_count: u32,
}

impl MeshAssembler {
    /// Vertices per glyph quad
    pub const QUAD_VERTICES: usize = 4;
    /// Indices per glyph quad
    pub const QUAD_INDICES: usize = 6;

    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler with room for `glyphs` quads
    pub fn with_capacity(glyphs: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(glyphs * Self::QUAD_VERTICES),
            tex_coords: Vec::with_capacity(glyphs * Self::QUAD_VERTICES),
            indices: Vec::with_capacity(glyphs * Self::QUAD_INDICES),
            vertex_count: 0,
        }
    }

    /// Append one quad
    ///
    /// Corners are (left,top), (right,top), (right,bottom), (left,bottom);
    /// the quad becomes triangles 0-1-2 and 2-3-0.
    pub fn append_quad(&mut self, positions: [[f32; 2]; 4], tex_coords: [[f32; 2]; 4]) {
        let base = self.vertex_count;
        self.vertices.extend_from_slice(&positions);
        self.tex_coords.extend_from_slice(&tex_coords);
        #[rustfmt::skip]
        let quad = [
            base, base + 1, base + 2,
            base + 2, base + 3, base,
        ];
        self.indices.extend_from_slice(&quad);
        self.vertex_count += Self::QUAD_VERTICES as u32;
    }

    /// Number of quads appended so far
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / Self::QUAD_VERTICES
    }

    /// Package the buffers together with the atlas image
    ///
    /// # Panics
    ///
    /// Panics if the buffers violate the quad indexing invariant, which only
    /// happens through a bug in this crate.
    pub fn finalize(self, atlas: AtlasImage) -> TextMesh {
        assert_eq!(
            self.vertices.len() % Self::QUAD_VERTICES,
            0,
            "vertex count is not a multiple of 4"
        );
        assert_eq!(
            self.vertices.len(),
            self.tex_coords.len(),
            "tex coords out of step with vertices"
        );
        assert_eq!(self.vertices.len(), self.vertex_count as usize, "vertex counter out of step");
        assert_eq!(
            self.indices.len(),
            self.quad_count() * Self::QUAD_INDICES,
            "index count does not match quad count"
        );
        debug_assert!(self.indices.iter().all(|&index| index < self.vertex_count));

        TextMesh {
            vertices: self.vertices,
            tex_coords: self.tex_coords,
            indices: self.indices,
            atlas,
        }
    }
}

/// Finished text geometry plus the atlas it samples from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMesh {
    vertices: Vec<[f32; 2]>,
    tex_coords: Vec<[f32; 2]>,
    indices: Vec<u32>,
    atlas: AtlasImage,
}

impl TextMesh {
    /// Mesh without geometry and with an empty atlas
    pub fn empty() -> Self {
        Self {
            atlas: AtlasImage::empty(),
            ..Self::default()
        }
    }

    /// Vertex positions, four per glyph
    pub fn vertices(&self) -> &[[f32; 2]] {
        &self.vertices
    }

    /// Texture coordinates, index-aligned with [`Self::vertices`]
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// Triangle indices, six per glyph
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Atlas snapshot the texture coordinates refer to
    pub fn atlas(&self) -> &AtlasImage {
        &self.atlas
    }

    /// Number of glyph quads
    pub fn glyph_count(&self) -> usize {
        self.vertices.len() / MeshAssembler::QUAD_VERTICES
    }

    /// Whether the mesh has no geometry
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Positions and texture coordinates zipped into one vertex buffer
    pub fn interleaved(&self) -> Vec<TextVertex> {
        self.vertices
            .iter()
            .zip(&self.tex_coords)
            .map(|(&position, &tex_coord)| TextVertex { position, tex_coord })
            .collect()
    }

    /// Raw bytes of the position buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the texture coordinate buffer
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }

    /// Raw bytes of the index buffer
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned box around every emitted vertex, `None` for empty meshes
    ///
    /// Useful for alignment, hit testing, and UI layout.
    pub fn bounds(&self) -> Option<TextBounds> {
        let (first, rest) = self.vertices.split_first()?;
        let initial = TextBounds {
            min_x: first[0],
            min_y: first[1],
            max_x: first[0],
            max_y: first[1],
        };

        Some(rest.iter().fold(initial, |bounds, &[x, y]| TextBounds {
            min_x: bounds.min_x.min(x),
            min_y: bounds.min_y.min(y),
            max_x: bounds.max_x.max(x),
            max_y: bounds.max_y.max(y),
        }))
    }
}
