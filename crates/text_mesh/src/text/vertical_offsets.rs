//! Per-character vertical corrections
//!
//! Some glyphs (punctuation, descenders, diacritics) come out of a font with
//! bounding boxes that sit oddly next to their neighbours. Instead of
//! special-casing characters inside the layout code, corrections are data:
//! a list of character classes, each with a vertical shift expressed as a
//! fraction of either the glyph's own height or the tallest glyph in the
//! string. The first matching rule wins.

use serde::{Deserialize, Serialize};

/// What an offset fraction is measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetBasis {
    /// Height of the glyph being placed
    #[default]
    GlyphHeight,
    /// Height of the tallest glyph in the string
    LineMaxHeight,
}

/// A set of characters a rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharClass {
    /// Any of the listed characters
    Chars(Vec<char>),
    /// An inclusive code point range
    Range(char, char),
    /// ASCII punctuation
    AsciiPunctuation,
}

impl CharClass {
    /// Whether `ch` belongs to this class
    pub fn contains(&self, ch: char) -> bool {
        match self {
            Self::Chars(chars) => chars.contains(&ch),
            Self::Range(first, last) => (*first..=*last).contains(&ch),
            Self::AsciiPunctuation => ch.is_ascii_punctuation(),
        }
    }
}

/// Vertical shift applied to the glyphs of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalOffsetRule {
    /// Characters the rule matches
    pub class: CharClass,
    /// Shift as a fraction of `basis`, positive moves down in glyph space
    pub fraction: f32,
    /// What `fraction` is measured against
    #[serde(default)]
    pub basis: OffsetBasis,
}

/// Ordered list of vertical offset rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerticalOffsetTable {
    rules: Vec<VerticalOffsetRule>,
}

impl VerticalOffsetTable {
    /// Table without rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; earlier rules take precedence
    #[must_use]
    pub fn with_rule(mut self, class: CharClass, fraction: f32, basis: OffsetBasis) -> Self {
        self.rules.push(VerticalOffsetRule { class, fraction, basis });
        self
    }

    /// Whether no rules are configured
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules in precedence order
    pub fn rules(&self) -> &[VerticalOffsetRule] {
        &self.rules
    }

    /// Glyph-space vertical shift for `ch`
    pub fn offset_for(&self, ch: char, glyph_height: f32, line_max_height: f32) -> f32 {
        self.rules
            .iter()
            .find(|rule| rule.class.contains(ch))
            .map_or(0.0, |rule| {
                let basis = match rule.basis {
                    OffsetBasis::GlyphHeight => glyph_height,
                    OffsetBasis::LineMaxHeight => line_max_height,
                };
                rule.fraction * basis
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VerticalOffsetTable {
        VerticalOffsetTable::new()
            .with_rule(
                CharClass::Chars(vec!['g', 'j', 'p', 'q', 'y']),
                0.25,
                OffsetBasis::GlyphHeight,
            )
            .with_rule(CharClass::Chars(vec!['\'', '"']), -0.5, OffsetBasis::LineMaxHeight)
            .with_rule(CharClass::AsciiPunctuation, 0.1, OffsetBasis::GlyphHeight)
    }

    #[test]
    fn test_descender_uses_glyph_height() {
        assert_eq!(table().offset_for('g', 20.0, 40.0), 5.0);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // '"' is also ASCII punctuation, but the quote rule comes first.
        assert_eq!(table().offset_for('"', 10.0, 40.0), -20.0);
        assert_eq!(table().offset_for('.', 10.0, 40.0), 1.0);
    }

    #[test]
    fn test_unmatched_character_has_no_offset() {
        assert_eq!(table().offset_for('A', 30.0, 40.0), 0.0);
        assert_eq!(VerticalOffsetTable::new().offset_for('g', 30.0, 40.0), 0.0);
    }

    #[test]
    fn test_range_class() {
        let class = CharClass::Range('\u{0300}', '\u{036f}');
        assert!(class.contains('\u{0301}'));
        assert!(!class.contains('a'));
    }

    #[test]
    fn test_table_from_ron() {
        let parsed: VerticalOffsetTable = ron::from_str(
            "[
                (class: Chars(['y']), fraction: 0.2),
                (class: AsciiPunctuation, fraction: 0.1, basis: LineMaxHeight),
            ]",
        )
        .unwrap();

        assert_eq!(parsed.rules().len(), 2);
        assert_eq!(parsed.rules()[0].basis, OffsetBasis::GlyphHeight);
        assert_eq!(parsed.offset_for('!', 10.0, 50.0), 5.0);
    }
}
