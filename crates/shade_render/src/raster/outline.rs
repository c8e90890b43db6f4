use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};

use super::canvas::{Canvas, CellSize};
use super::{GlyphError, GlyphPainter};
use crate::palette::color::Color;

#[derive(Debug, thiserror::Error)]
pub enum FontLoadError {
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse font: {0}")]
    Invalid(#[from] ab_glyph::InvalidFont),
}

/// TrueType/OpenType font rasterized with anti-aliasing.
pub struct OutlineFont {
    font: FontVec,
    scale: PxScale,
    name: String,
}

impl OutlineFont {
    /// Load the first face in the file at `path`, sized to `size` pixels per em.
    pub fn from_path(path: &Path, size: f32) -> Result<Self, FontLoadError> {
        let data = fs::read(path)?;
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        Self::from_bytes(data, size, name)
    }

    pub fn from_bytes(data: Vec<u8>, size: f32, name: impl Into<String>) -> Result<Self, FontLoadError> {
        let font = FontVec::try_from_vec_and_index(data, 0)?;
        // PxScale measures ascent to descent, not the em square.
        let scale = match font.units_per_em() {
            Some(units_per_em) if units_per_em > 0.0 => {
                PxScale::from(size * font.height_unscaled() / units_per_em)
            },
            _ => PxScale::from(size),
        };
        Ok(Self { font, scale, name: name.into() })
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }
}

impl GlyphPainter for OutlineFont {
    fn name(&self) -> &str {
        &self.name
    }

    /// Advance of `M` by ascent plus descent.
    fn cell_size(&self) -> CellSize {
        let scaled = self.font.as_scaled(self.scale);
        let width = scaled.h_advance(self.font.glyph_id('M')).ceil().max(1.0);
        let height = (scaled.ascent() - scaled.descent()).ceil().max(1.0);
        CellSize::new(width as u32, height as u32)
    }

    fn draw_glyph(
        &self,
        canvas: &mut Canvas,
        column: u32,
        row: u32,
        ch: char,
        color: Color,
    ) -> Result<(), GlyphError> {
        let rect = canvas.cell_rect(column, row)?;
        let id = self.font.glyph_id(ch);
        if id.0 == 0 && !ch.is_whitespace() {
            return Err(GlyphError::Unsupported(ch));
        }

        let scaled = self.font.as_scaled(self.scale);
        let (center_x, center_y) = rect.center();
        // Middle of the advance horizontally, middle of ascent..descent vertically.
        let left = center_x - scaled.h_advance(id) / 2.0;
        let baseline = center_y + (scaled.ascent() + scaled.descent()) / 2.0;

        let glyph = id.with_scale_and_position(self.scale, point(left, baseline));
        let Some(outlined) = self.font.outline_glyph(glyph) else {
            // Whitespace and other empty glyphs have no outline.
            return Ok(());
        };

        let bounds = outlined.px_bounds();
        let origin_x = bounds.min.x.floor() as i64;
        let origin_y = bounds.min.y.floor() as i64;
        outlined.draw(|x, y, coverage| {
            canvas.blend_pixel(origin_x + i64::from(x), origin_y + i64::from(y), color, coverage);
        });

        Ok(())
    }
}
