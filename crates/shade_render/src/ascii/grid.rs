use super::glyphs::GlyphSet;

/// Quantized brightness, one level per cell, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGrid {
    pub width: u32,
    pub height: u32,
    pub levels: Vec<usize>,
}

impl LevelGrid {
    pub fn new(width: u32, height: u32, levels: Vec<usize>) -> Self {
        assert_eq!(width as usize * height as usize, levels.len());
        Self { width, height, levels }
    }

    pub fn level_at(&self, column: u32, row: u32) -> Option<usize> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.levels.get(row as usize * self.width as usize + column as usize).copied()
    }

    /// `(column, row, level)` for every cell.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, usize)> + '_ {
        let width = self.width.max(1);
        self.levels
            .iter()
            .enumerate()
            .map(move |(index, &level)| (index as u32 % width, index as u32 / width, level))
    }

    pub fn rows<'a>(&'a self, glyphs: &'a GlyphSet) -> impl Iterator<Item = String> + 'a {
        let width = (self.width as usize).max(1);
        self.levels
            .chunks(width)
            .map(move |row| row.iter().map(|&level| glyphs.char_at(level)).collect::<String>())
    }
}
