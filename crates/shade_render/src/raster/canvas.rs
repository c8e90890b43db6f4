use image::{Rgb, RgbImage};

use super::GlyphError;
use crate::image_pipeline::resize::GridGeometry;
use crate::palette::color::Color;
use crate::ShadeError;

/// Pixel size of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height:width ratio of the cell; dividing rows by it keeps source proportions.
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width.max(1) as f32
    }
}

/// Pixel region covered by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub fn center(&self) -> (f32, f32) {
        (self.x as f32 + self.width as f32 / 2.0, self.y as f32 + self.height as f32 / 2.0)
    }
}

/// Output raster laid out as a grid of equally sized cells.
pub struct Canvas {
    image: RgbImage,
    geometry: GridGeometry,
    cell: CellSize,
}

impl Canvas {
    /// A canvas for `geometry` with every pixel set to `background`.
    pub fn new(geometry: GridGeometry, cell: CellSize, background: Color) -> Result<Self, ShadeError> {
        let width = geometry.columns.checked_mul(cell.width);
        let height = geometry.rows.checked_mul(cell.height);
        let (width, height) = match (width, height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(ShadeError::InvalidLayout),
        };
        // Keep the backing buffer addressable.
        let bytes = u64::from(width).checked_mul(u64::from(height)).and_then(|n| n.checked_mul(3));
        if bytes.map_or(true, |bytes| bytes > isize::MAX as u64) {
            return Err(ShadeError::InvalidLayout);
        }

        let image = RgbImage::from_pixel(width, height, background.to_rgb());
        Ok(Self { image, geometry, cell })
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    pub fn cell_rect(&self, column: u32, row: u32) -> Result<CellRect, GlyphError> {
        if column >= self.geometry.columns || row >= self.geometry.rows {
            return Err(GlyphError::OutOfBounds { column, row });
        }
        Ok(CellRect {
            x: column * self.cell.width,
            y: row * self.cell.height,
            width: self.cell.width,
            height: self.cell.height,
        })
    }

    pub fn fill_cell(&mut self, column: u32, row: u32, color: Color) -> Result<(), GlyphError> {
        let rect = self.cell_rect(column, row)?;
        let pixel = color.to_rgb();
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.image.put_pixel(x, y, pixel);
            }
        }
        Ok(())
    }

    /// Set one pixel; coordinates outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        self.blend_pixel(x, y, color, 1.0);
    }

    /// Mix `color` over the existing pixel by `coverage` in `[0, 1]`.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }

        let coverage = coverage.clamp(0.0, 1.0);
        if coverage <= 0.0 {
            return;
        }

        let pixel = self.image.get_pixel_mut(x, y);
        if coverage >= 1.0 {
            *pixel = color.to_rgb();
            return;
        }

        let Rgb(existing) = *pixel;
        let target = color.channels();
        let mut mixed = [0u8; 3];
        for i in 0..3 {
            let value = f32::from(existing[i]) * (1.0 - coverage) + f32::from(target[i]) * coverage;
            mixed[i] = value.round().clamp(0.0, 255.0) as u8;
        }
        *pixel = Rgb(mixed);
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(columns: u32, rows: u32) -> GridGeometry {
        GridGeometry { columns, rows, cell_aspect: 1.0 }
    }

    #[test]
    fn starts_filled_with_background() {
        let bg = Color::new(3, 4, 5);
        let canvas = Canvas::new(geometry(3, 2), CellSize::new(4, 5), bg).unwrap();
        assert_eq!(canvas.image().dimensions(), (12, 10));
        assert!(canvas.image().pixels().all(|p| *p == bg.to_rgb()));
    }

    #[test]
    fn fill_cell_covers_exactly_the_cell() {
        let bg = Color::BLACK;
        let fg = Color::new(200, 100, 50);
        let mut canvas = Canvas::new(geometry(3, 2), CellSize::new(4, 5), bg).unwrap();
        canvas.fill_cell(1, 1, fg).unwrap();

        for (x, y, pixel) in canvas.image().enumerate_pixels() {
            let inside = (4..8).contains(&x) && (5..10).contains(&y);
            let expected = if inside { fg } else { bg };
            assert_eq!(*pixel, expected.to_rgb(), "pixel {x},{y}");
        }
    }

    #[test]
    fn cells_outside_the_grid_are_errors() {
        let mut canvas = Canvas::new(geometry(2, 2), CellSize::new(2, 2), Color::BLACK).unwrap();
        assert!(matches!(
            canvas.fill_cell(2, 0, Color::WHITE),
            Err(GlyphError::OutOfBounds { column: 2, row: 0 })
        ));
    }

    #[test]
    fn blending_mixes_and_clips() {
        let mut canvas = Canvas::new(geometry(1, 1), CellSize::new(2, 2), Color::BLACK).unwrap();
        canvas.blend_pixel(0, 0, Color::new(200, 100, 0), 0.5);
        canvas.blend_pixel(-1, 0, Color::WHITE, 1.0);
        canvas.blend_pixel(0, 9, Color::WHITE, 1.0);
        assert_eq!(canvas.image().get_pixel(0, 0), &Rgb([100, 50, 0]));
        assert_eq!(canvas.image().get_pixel(1, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn overflowing_canvas_is_rejected() {
        let result = Canvas::new(geometry(u32::MAX, 1), CellSize::new(2, 1), Color::BLACK);
        assert!(matches!(result, Err(ShadeError::InvalidLayout)));

        let result = Canvas::new(geometry(1, 1), CellSize::new(u32::MAX, u32::MAX), Color::BLACK);
        assert!(matches!(result, Err(ShadeError::InvalidLayout)));
    }
}
