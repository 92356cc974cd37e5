//! Coordinate conventions for emitted text geometry

use serde::{Deserialize, Serialize};

/// Direction of the y axis in the space the mesh is emitted into
///
/// - `Down`: screen/pixel space, lines advance toward larger y
/// - `Up`: OpenGL-style space, lines advance toward smaller y
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YAxis {
    /// y grows downward
    #[default]
    Down,
    /// y grows upward
    Up,
}

impl YAxis {
    /// Signed distance the pen moves for one line break
    pub fn line_step(self, line_spacing: f32) -> f32 {
        match self {
            Self::Down => line_spacing,
            Self::Up => -line_spacing,
        }
    }

    /// Map a downward glyph-space offset onto this axis
    pub fn offset(self, glyph_space_y: f32) -> f32 {
        match self {
            Self::Down => glyph_space_y,
            Self::Up => -glyph_space_y,
        }
    }
}

/// Which image row texture coordinate `v = 0` refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TexCoordOrigin {
    /// `v = 0` is the first (top) row of the atlas image
    #[default]
    TopLeft,
    /// `v = 0` is the last (bottom) row, as when rows are uploaded bottom-up
    BottomLeft,
}

impl TexCoordOrigin {
    /// Convert a top-down normalized row coordinate into this convention
    pub fn v(self, top_down: f32) -> f32 {
        match self {
            Self::TopLeft => top_down,
            Self::BottomLeft => 1.0 - top_down,
        }
    }
}
