//! Line layout
//!
//! Resolves the glyphs a string needs and walks it once, moving a pen along
//! each line and handing every glyph to the [`GlyphQuadEmitter`].

use std::collections::HashMap;

use super::{
    GlyphError, GlyphMetrics, GlyphQuadEmitter, GlyphSource, MeshAssembler, MissingGlyphPolicy,
    YAxis,
};
use crate::foundation::math::Vec2;

/// How a character of the string will be rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedGlyph {
    /// Drawn with the metrics of `ch`, which is a substitute when the
    /// requested character was missing
    Drawn {
        /// Character whose glyph is drawn
        ch: char,
        /// Its metrics
        metrics: GlyphMetrics,
    },
    /// Not drawn; the pen still moves by `advance`
    Skipped {
        /// Pen advance in pixels
        advance: f32,
    },
}

impl ResolvedGlyph {
    /// Horizontal pen advance
    pub fn advance(&self) -> f32 {
        match self {
            Self::Drawn { metrics, .. } => metrics.advance,
            Self::Skipped { advance } => *advance,
        }
    }
}

/// Glyphs of every distinct character in a string
///
/// Building the table queries each character once, which guarantees the
/// provider has rasterized them all before the atlas image is taken.
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    entries: HashMap<char, ResolvedGlyph>,
    max_height: f32,
}

impl GlyphTable {
    /// Query every distinct character of `text`, applying the fallback policy
    /// to characters the provider cannot supply
    pub fn resolve<S: GlyphSource + ?Sized>(
        source: &mut S,
        text: &str,
        size: u32,
        bold: bool,
        policy: &MissingGlyphPolicy,
    ) -> Self {
        let mut table = Self::default();

        for ch in text.chars().filter(|&ch| !is_line_break(ch)) {
            if table.entries.contains_key(&ch) {
                continue;
            }

            let resolved = match source.glyph(ch, size, bold) {
                Ok(metrics) => ResolvedGlyph::Drawn { ch, metrics },
                Err(error @ GlyphError::MissingGlyph(_)) => {
                    fallback(source, ch, &error, size, bold, policy)
                }
                Err(error) => {
                    let advance = policy.fallback_advance * size as f32;
                    log::error!("Cannot rasterize {:?}: {}; skipping it", ch, error);
                    ResolvedGlyph::Skipped { advance }
                }
            };

            if let ResolvedGlyph::Drawn { metrics, .. } = &resolved {
                table.max_height = table.max_height.max(metrics.bounds_height);
            }
            table.entries.insert(ch, resolved);
        }

        table
    }

    /// Resolution of `ch`, `None` if it was not part of the resolved text
    pub fn get(&self, ch: char) -> Option<&ResolvedGlyph> {
        self.entries.get(&ch)
    }

    /// Tallest ink height among the drawn glyphs
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Number of distinct characters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the text had no characters besides line breaks
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fallback<S: GlyphSource + ?Sized>(
    source: &mut S,
    ch: char,
    error: &GlyphError,
    size: u32,
    bold: bool,
    policy: &MissingGlyphPolicy,
) -> ResolvedGlyph {
    if let Some(substitute) = policy.substitute.filter(|&substitute| substitute != ch) {
        if let Ok(metrics) = source.glyph(substitute, size, bold) {
            log::warn!("{}; drawing {:?} instead", error, substitute);
            return ResolvedGlyph::Drawn { ch: substitute, metrics };
        }
    }

    let advance = policy.fallback_advance * size as f32;
    log::warn!("{}; skipping it with a {}px advance", error, advance);
    ResolvedGlyph::Skipped { advance }
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Mutable 2D cursor for one layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenPosition {
    origin: Vec2,
    position: Vec2,
}

impl PenPosition {
    /// Pen at `origin`
    pub fn new(origin: Vec2) -> Self {
        Self { origin, position: origin }
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move along the line
    pub fn advance(&mut self, dx: f32) {
        self.position.x += dx;
    }

    /// Return to the start of the line and move `dy` across lines
    pub fn new_line(&mut self, dy: f32) {
        self.position.x = self.origin.x;
        self.position.y += dy;
    }
}

/// Where a character's glyph origin ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    /// The character from the string
    pub ch: char,
    /// Pen position the glyph was placed at
    pub pen: Vec2,
    /// Whether a quad was emitted for it
    pub emitted: bool,
}

/// Result of walking a string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSummary {
    /// One entry per character, line breaks excluded, in string order
    pub placements: Vec<GlyphPlacement>,
    /// Number of lines laid out
    pub lines: usize,
}

/// Walks a string once, emitting a quad per visible glyph
#[derive(Debug, Clone)]
pub struct LineLayoutWalker<'a> {
    emitter: &'a GlyphQuadEmitter,
    origin: Vec2,
    y_axis: YAxis,
    query_kerning_before_newline: bool,
}

impl<'a> LineLayoutWalker<'a> {
    /// Create a walker that starts every pass at `origin`
    pub fn new(
        emitter: &'a GlyphQuadEmitter,
        origin: Vec2,
        y_axis: YAxis,
        query_kerning_before_newline: bool,
    ) -> Self {
        Self {
            emitter,
            origin,
            y_axis,
            query_kerning_before_newline,
        }
    }

    /// Lay out `text` into `mesh`
    ///
    /// `glyphs` must come from [`GlyphTable::resolve`] over the same text.
    /// Kerning is applied between consecutive characters of a line; a line
    /// break resets it. Carriage returns produce no geometry and do not move
    /// the pen. `\r\n` lays out exactly like `\n`; a lone `\r` only ends
    /// the kerning pair.
    pub fn walk<S: GlyphSource + ?Sized>(
        &self,
        source: &mut S,
        glyphs: &GlyphTable,
        text: &str,
        size: u32,
        atlas_size: (u32, u32),
        mesh: &mut MeshAssembler,
    ) -> LayoutSummary {
        let line_step = self.y_axis.line_step(source.line_spacing(size));
        let max_height = glyphs.max_height();

        let mut pen = PenPosition::new(self.origin);
        let mut previous: Option<char> = None;
        let mut summary = LayoutSummary { placements: Vec::with_capacity(text.len()), lines: 1 };

        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\r' {
                if chars.peek() != Some(&'\n') {
                    previous = None;
                }
                continue;
            }
            let newline = ch == '\n';

            if let Some(prev) = previous {
                if !newline || self.query_kerning_before_newline {
                    pen.advance(source.kerning(prev, ch, size));
                }
            }

            if newline {
                pen.new_line(line_step);
                previous = None;
                summary.lines += 1;
                continue;
            }

            let Some(resolved) = glyphs.get(ch) else {
                log::error!("Character {:?} was not resolved before layout, leaving it out", ch);
                continue;
            };

            let emitted = match resolved {
                ResolvedGlyph::Drawn { ch: drawn, metrics } => {
                    self.emitter.emit(mesh, *drawn, metrics, pen.position(), atlas_size, max_height)
                }
                ResolvedGlyph::Skipped { .. } => false,
            };

            summary.placements.push(GlyphPlacement { ch, pen: pen.position(), emitted });
            pen.advance(resolved.advance());
            previous = Some(ch);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{AtlasImage, AtlasRect, GlyphResult, TextMeshConfig};

    /// Monospace provider counting how often it is asked for kerning
    #[derive(Default)]
    struct Monospace {
        kerning_queries: Vec<(char, char)>,
    }

    impl GlyphSource for Monospace {
        fn glyph(&mut self, ch: char, size: u32, _bold: bool) -> GlyphResult<GlyphMetrics> {
            match ch {
                'a'..='z' | '?' => Ok(GlyphMetrics {
                    bounds_left: 0.0,
                    bounds_top: -10.0,
                    bounds_width: 8.0,
                    bounds_height: 10.0,
                    atlas_rect: AtlasRect::new(0, 0, 8, 10),
                    advance: 10.0,
                }),
                ' ' => Ok(GlyphMetrics { advance: 10.0, ..GlyphMetrics::default() }),
                '#' => Err(GlyphError::AtlasFull { size, dim: 16 }),
                _ => Err(GlyphError::MissingGlyph(ch)),
            }
        }

        fn kerning(&mut self, previous: char, next: char, _size: u32) -> f32 {
            self.kerning_queries.push((previous, next));
            0.0
        }

        fn line_spacing(&mut self, _size: u32) -> f32 {
            20.0
        }

        fn atlas_image(&self, _size: u32) -> GlyphResult<AtlasImage> {
            Ok(AtlasImage::coverage(16, 16))
        }
    }

    fn walk(config: &TextMeshConfig, source: &mut Monospace, text: &str) -> (LayoutSummary, usize) {
        let emitter = GlyphQuadEmitter::new(config);
        let walker = LineLayoutWalker::new(
            &emitter,
            Vec2::new(config.origin[0], config.origin[1]),
            config.y_axis,
            config.query_kerning_before_newline,
        );
        let table = GlyphTable::resolve(source, text, 10, false, &config.missing_glyph);
        let mut mesh = MeshAssembler::new();
        let summary = walker.walk(source, &table, text, 10, (16, 16), &mut mesh);
        (summary, mesh.quad_count())
    }

    #[test]
    fn test_pen_advances_and_breaks_lines() {
        let mut source = Monospace::default();
        let (summary, quads) = walk(&TextMeshConfig::default(), &mut source, "ab c\nd");

        let pens: Vec<_> = summary.placements.iter().map(|p| (p.ch, p.pen.x, p.pen.y)).collect();
        assert_eq!(
            pens,
            vec![
                ('a', 0.0, 0.0),
                ('b', 10.0, 0.0),
                (' ', 20.0, 0.0),
                ('c', 30.0, 0.0),
                ('d', 0.0, 20.0),
            ]
        );
        assert_eq!(summary.lines, 2);
        assert_eq!(quads, 4);
    }

    #[test]
    fn test_origin_and_y_up() {
        let config = TextMeshConfig {
            origin: [5.0, 100.0],
            y_axis: YAxis::Up,
            ..TextMeshConfig::default()
        };
        let mut source = Monospace::default();
        let (summary, _) = walk(&config, &mut source, "a\nb");

        assert_eq!(summary.placements[0].pen, Vec2::new(5.0, 100.0));
        assert_eq!(summary.placements[1].pen, Vec2::new(5.0, 80.0));
    }

    #[test]
    fn test_kerning_skips_newlines_by_default() {
        let mut source = Monospace::default();
        walk(&TextMeshConfig::default(), &mut source, "ab\ncd");

        assert_eq!(source.kerning_queries, vec![('a', 'b'), ('c', 'd')]);
    }

    #[test]
    fn test_kerning_before_newline_when_requested() {
        let config = TextMeshConfig {
            query_kerning_before_newline: true,
            ..TextMeshConfig::default()
        };
        let mut source = Monospace::default();
        walk(&config, &mut source, "ab\ncd");

        assert_eq!(source.kerning_queries, vec![('a', 'b'), ('b', '\n'), ('c', 'd')]);
    }

    #[test]
    fn test_crlf_matches_lf() {
        let mut source = Monospace::default();
        let (lf, _) = walk(&TextMeshConfig::default(), &mut source, "ab\ncd");
        let (crlf, _) = walk(&TextMeshConfig::default(), &mut source, "ab\r\ncd");

        assert_eq!(lf, crlf);
    }

    #[test]
    fn test_crlf_kerning_queries_match_lf() {
        let config = TextMeshConfig {
            query_kerning_before_newline: true,
            ..TextMeshConfig::default()
        };
        let mut lf = Monospace::default();
        let mut crlf = Monospace::default();
        walk(&config, &mut lf, "ab\ncd");
        walk(&config, &mut crlf, "ab\r\ncd");

        assert_eq!(lf.kerning_queries, crlf.kerning_queries);
    }

    #[test]
    fn test_lone_carriage_return_breaks_kerning_pair() {
        let mut source = Monospace::default();
        let (summary, quads) = walk(&TextMeshConfig::default(), &mut source, "a\rb");

        assert!(source.kerning_queries.is_empty());
        assert_eq!(quads, 2);
        assert_eq!(summary.lines, 1);
        let pens: Vec<_> = summary.placements.iter().map(|p| (p.ch, p.pen.x)).collect();
        assert_eq!(pens, vec![('a', 0.0), ('b', 10.0)]);
    }

    #[test]
    fn test_rasterization_failure_is_skipped_not_substituted() {
        let mut source = Monospace::default();
        let policy = MissingGlyphPolicy::default();
        let table = GlyphTable::resolve(&mut source, "#", 10, false, &policy);

        assert_eq!(table.get('#'), Some(&ResolvedGlyph::Skipped { advance: 5.0 }));
    }

    #[test]
    fn test_missing_glyph_is_substituted() {
        let mut source = Monospace::default();
        let policy = MissingGlyphPolicy::default();
        let table = GlyphTable::resolve(&mut source, "aÄ", 10, false, &policy);

        assert!(matches!(table.get('Ä'), Some(ResolvedGlyph::Drawn { ch: '?', .. })));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_glyph_without_substitute_is_skipped() {
        let policy = MissingGlyphPolicy { substitute: None, fallback_advance: 0.5 };
        let mut source = Monospace::default();
        let table = GlyphTable::resolve(&mut source, "Ä", 10, false, &policy);

        assert_eq!(table.get('Ä'), Some(&ResolvedGlyph::Skipped { advance: 5.0 }));
        assert_eq!(table.max_height(), 0.0);
    }

    #[test]
    fn test_skipped_glyph_still_advances_pen() {
        let config = TextMeshConfig {
            missing_glyph: MissingGlyphPolicy { substitute: Some('Ö'), fallback_advance: 0.5 },
            ..TextMeshConfig::default()
        };
        let mut source = Monospace::default();
        let (summary, quads) = walk(&config, &mut source, "Äa");

        assert_eq!(quads, 1);
        assert!(!summary.placements[0].emitted);
        assert_eq!(summary.placements[1].pen.x, 5.0);
    }

    #[test]
    fn test_pen_position_new_line_resets_to_origin_x() {
        let mut pen = PenPosition::new(Vec2::new(3.0, 4.0));
        pen.advance(10.0);
        pen.new_line(-7.0);

        assert_eq!(pen.position(), Vec2::new(3.0, -3.0));
    }
}
