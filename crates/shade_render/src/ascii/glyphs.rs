use crate::ShadeError;

/// Characters ordered sparse to dense; one foreground level per character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSet {
    chars: Vec<char>,
}

impl GlyphSet {
    pub const STANDARD: &'static str = " .:-=+*#%@$";

    pub fn new(chars: impl Into<String>) -> Result<Self, ShadeError> {
        let chars: Vec<char> = chars.into().chars().collect();
        if chars.is_empty() {
            return Err(ShadeError::InvalidArgument("character set cannot be empty".into()));
        }
        Ok(Self { chars })
    }

    pub fn standard() -> Self {
        Self { chars: Self::STANDARD.chars().collect() }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_at(&self, level: usize) -> char {
        self.chars[level.min(self.chars.len() - 1)]
    }

    /// Whether `level` draws nothing visible.
    pub fn is_blank(&self, level: usize) -> bool {
        self.char_at(level).is_whitespace()
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_rejected() {
        assert!(matches!(GlyphSet::new(""), Err(ShadeError::InvalidArgument(_))));
    }

    #[test]
    fn counts_chars_not_bytes() {
        let glyphs = GlyphSet::new("░▒▓").unwrap();
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs.char_at(1), '▒');
    }

    #[test]
    fn char_at_clamps_to_densest() {
        let glyphs = GlyphSet::new("ab").unwrap();
        assert_eq!(glyphs.char_at(7), 'b');
    }

    #[test]
    fn standard_set_starts_blank() {
        let glyphs = GlyphSet::standard();
        assert_eq!(glyphs.len(), 11);
        assert!(glyphs.is_blank(0));
        assert!(!glyphs.is_blank(1));
    }
}
