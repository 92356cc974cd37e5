//! # Text Mesh
//!
//! Builds renderable text meshes from glyph atlases.
//!
//! ## Features
//!
//! - **Lazy Font Atlases**: TTF/OTF glyphs rasterized on demand into growable pages
//! - **Baked Fonts**: Pre-rendered atlas images with RON/TOML glyph tables
//! - **Kerning and Line Breaks**: Pen walk with per-pair kerning
//! - **Explicit Conventions**: Y-up or y-down output, top-left or bottom-left UVs
//! - **GPU-Ready Buffers**: `bytemuck` byte views of vertices and indices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_mesh::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     text_mesh::foundation::logging::init();
//!
//!     let mut font = FontAtlas::from_file("res/Montserrat-Bold.ttf")?;
//!     let builder = TextMeshBuilder::new(TextMeshConfig::default())?;
//!
//!     let mut label = TextLabel::new(256);
//!     label.set_text("Hello world\n");
//!     label.set_position(Vec3::new(200.0, 500.0, 0.0));
//!     label.set_char_size(32.0);
//!
//!     let mesh = label.mesh(&builder, &mut font)?;
//!     println!("{} indices", mesh.indices().len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

pub mod config;
pub mod foundation;
pub mod text;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::{Mat4, Vec2, Vec3},
        text::{
            AtlasImage, BakedFont, FontAtlas, GlyphError, GlyphSource, TexCoordOrigin, TextLabel,
            TextMesh, TextMeshBuilder, TextMeshConfig, TextMeshError, YAxis,
        },
    };
}
