pub mod glyphs;
pub mod grid;
pub mod levels;
