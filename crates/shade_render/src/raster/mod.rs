pub mod bitmap;
pub mod canvas;
pub mod fonts;
pub mod outline;

use log::warn;

use crate::ascii::glyphs::GlyphSet;
use crate::ascii::grid::LevelGrid;
use crate::palette::color::Color;
use crate::palette::ramp::ShadeRamp;

use canvas::{Canvas, CellSize};

/// Failure to draw a single cell. The rest of the canvas still renders.
#[derive(Debug, thiserror::Error)]
pub enum GlyphError {
    #[error("glyph {0:?} is not available in the active font")]
    Unsupported(char),
    #[error("cell ({column}, {row}) lies outside the grid")]
    OutOfBounds { column: u32, row: u32 },
    #[error("no shade for level {0}")]
    MissingShade(usize),
}

/// A font resource able to draw one character into one cell.
pub trait GlyphPainter {
    fn name(&self) -> &str;

    /// Cell size the font's metrics call for.
    fn cell_size(&self) -> CellSize;

    /// Draw `ch` centered in the cell at (`column`, `row`).
    fn draw_glyph(
        &self,
        canvas: &mut Canvas,
        column: u32,
        row: u32,
        ch: char,
        color: Color,
    ) -> Result<(), GlyphError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub drawn: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Fill each cell with its ramp shade; level 0 is the background itself.
pub fn paint_blocks(
    canvas: &mut Canvas,
    grid: &LevelGrid,
    ramp: &ShadeRamp,
    skip_background: bool,
) -> RenderReport {
    let mut report = RenderReport::default();

    for (column, row, level) in grid.cells() {
        if skip_background && level == 0 {
            report.skipped += 1;
            continue;
        }

        let result = ramp
            .get(level)
            .ok_or(GlyphError::MissingShade(level))
            .and_then(|color| canvas.fill_cell(column, row, color));
        match result {
            Ok(()) => report.drawn += 1,
            Err(err) => {
                warn!("failed to fill cell ({column}, {row}): {err}");
                report.failed += 1;
            },
        }
    }

    report
}

/// Draw each cell's glyph in the shade one step above its level.
pub fn paint_glyphs(
    canvas: &mut Canvas,
    grid: &LevelGrid,
    ramp: &ShadeRamp,
    glyphs: &GlyphSet,
    painter: &dyn GlyphPainter,
    skip_blank: bool,
) -> RenderReport {
    let mut report = RenderReport::default();

    for (column, row, level) in grid.cells() {
        if skip_blank && level == 0 && glyphs.is_blank(level) {
            report.skipped += 1;
            continue;
        }

        let ch = glyphs.char_at(level);
        let result = ramp
            .get(level + 1)
            .ok_or(GlyphError::MissingShade(level + 1))
            .and_then(|color| painter.draw_glyph(canvas, column, row, ch, color));
        match result {
            Ok(()) => report.drawn += 1,
            Err(err) => {
                warn!("failed to draw {ch:?} at ({column}, {row}) with {}: {err}", painter.name());
                report.failed += 1;
            },
        }
    }

    report
}
