//! Retained text label
//!
//! Keeps a string, where it is drawn and how big, and rebuilds its mesh only
//! when something that affects the geometry changes.

use super::{GlyphSource, TextMesh, TextMeshBuilder, TextMeshError};
use crate::foundation::math::{translation_scale, Mat4, Vec3};

/// A positioned piece of text with a cached mesh
///
/// The mesh is laid out at `pixel_size` in atlas pixels; the model matrix
/// scales it to `char_size` and moves it to `position`, so moving or
/// resizing a label never rebuilds it.
#[derive(Debug, Clone)]
pub struct TextLabel {
    text: String,
    position: Vec3,
    char_size: f32,
    pixel_size: u32,
    mesh: TextMesh,
    dirty: bool,
}

impl TextLabel {
    /// Create an empty label whose glyphs are rasterized at `pixel_size`
    pub fn new(pixel_size: u32) -> Self {
        Self {
            text: String::new(),
            position: Vec3::zeros(),
            char_size: pixel_size as f32,
            pixel_size,
            mesh: TextMesh::empty(),
            dirty: true,
        }
    }

    /// Current string
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the string; setting the same string keeps the cached mesh
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    /// Where the pen origin is drawn
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the label
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// On-screen character size
    pub fn char_size(&self) -> f32 {
        self.char_size
    }

    /// Set the on-screen character size
    pub fn set_char_size(&mut self, char_size: f32) {
        self.char_size = char_size;
    }

    /// Size the glyphs are rasterized at
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Change the rasterization size; the next [`mesh`](Self::mesh) call rebuilds
    pub fn set_pixel_size(&mut self, pixel_size: u32) {
        if pixel_size != self.pixel_size {
            self.pixel_size = pixel_size;
            self.dirty = true;
        }
    }

    /// Whether the cached mesh is out of date
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Translation to `position` times uniform scale `char_size / pixel_size`
    pub fn model_matrix(&self) -> Mat4 {
        let scale = if self.pixel_size == 0 {
            0.0
        } else {
            self.char_size / self.pixel_size as f32
        };
        translation_scale(self.position, scale)
    }

    /// The label's mesh, rebuilt first if the text or pixel size changed
    ///
    /// On failure the previous mesh is kept and the label stays dirty.
    pub fn mesh<S: GlyphSource + ?Sized>(
        &mut self,
        builder: &TextMeshBuilder,
        source: &mut S,
    ) -> Result<&TextMesh, TextMeshError> {
        if self.dirty {
            self.mesh = builder.build(source, &self.text, self.pixel_size)?;
            self.dirty = false;
        }
        Ok(&self.mesh)
    }
}
