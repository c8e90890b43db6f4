use image::imageops::{self, FilterType};
use image::GrayImage;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub columns: u32,
    pub rows: u32,
    /// Correction factor `rows` were divided by.
    pub cell_aspect: f32,
}

impl GridGeometry {
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Fixed column count; rows follow from the source aspect and the cell shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub columns: u32,
    pub cell_aspect: f32,
}

impl GridLayout {
    pub fn new(columns: u32, cell_aspect: f32) -> Self {
        Self { columns, cell_aspect }
    }

    /// `rows = round(columns * (source_height / source_width) / cell_aspect)`, at least 1.
    pub fn derive(&self, source_width: u32, source_height: u32) -> Option<GridGeometry> {
        if source_width == 0 || source_height == 0 {
            return None;
        }
        if !self.cell_aspect.is_finite() || self.cell_aspect <= 0.0 {
            return None;
        }

        let columns = self.columns.max(1);
        let image_ratio = f64::from(source_height) / f64::from(source_width);
        let rows = (f64::from(columns) * image_ratio / f64::from(self.cell_aspect)).round();
        let rows = (rows as u32).max(1);

        Some(GridGeometry { columns, rows, cell_aspect: self.cell_aspect })
    }
}

/// Downsample brightness to one value per cell with a Lanczos filter.
pub fn downsample(gray: &GrayImage, geometry: GridGeometry) -> GrayImage {
    if gray.dimensions() == (geometry.columns, geometry.rows) {
        return gray.clone();
    }
    imageops::resize(gray, geometry.columns, geometry.rows, FilterType::Lanczos3)
}
