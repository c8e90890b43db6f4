mod ascii;
mod image_pipeline;
mod palette;
mod raster;

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use log::{debug, info};

pub use ascii::{glyphs::GlyphSet, grid::LevelGrid, levels::level_for};
pub use image_pipeline::{
    adjust::MAX_POSTERIZE_BITS,
    loader::load_source,
    resize::{GridGeometry, GridLayout},
};
pub use palette::{
    color::Color,
    ramp::{RampOptions, ShadeRamp},
};
pub use raster::{
    bitmap::BitmapFont,
    canvas::{Canvas, CellRect, CellSize},
    fonts::{FontOptions, DEFAULT_CANDIDATES, DEFAULT_FONT_SIZE},
    outline::{FontLoadError, OutlineFont},
    GlyphError, GlyphPainter, RenderReport,
};

use ascii::levels::LevelMapper;
use image_pipeline::{adjust, resize};

#[derive(Debug, thiserror::Error)]
pub enum ShadeError {
    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to load image {path:?}: {source}")]
    Load { path: PathBuf, source: image::ImageError },
    #[error("failed to save image {path:?}: {source}")]
    Save { path: PathBuf, source: image::ImageError },
    #[error("unsupported layout dimensions")]
    InvalidLayout,
}

/// Cell size of the block style when none is given.
pub const DEFAULT_BLOCK_CELL: CellSize = CellSize::new(10, 16);

/// How each cell is drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum CellStyle {
    /// Solid rectangles, one ramp shade per brightness level.
    Blocks {
        /// Total shades including the background.
        shades: usize,
        /// Leave level 0 cells unpainted.
        skip_background: bool,
    },
    /// One glyph per cell, tinted with the shade above its level.
    Glyphs {
        glyphs: GlyphSet,
        font: FontOptions,
        /// Leave cells unpainted when their glyph is blank and their level is 0.
        skip_blank: bool,
    },
}

impl CellStyle {
    /// Number of brightness buckets.
    pub fn levels(&self) -> usize {
        match self {
            CellStyle::Blocks { shades, .. } => *shades,
            CellStyle::Glyphs { glyphs, .. } => glyphs.len(),
        }
    }

    /// Ramp length, background included.
    pub fn total_shades(&self) -> usize {
        match self {
            CellStyle::Blocks { shades, .. } => *shades,
            CellStyle::Glyphs { glyphs, .. } => glyphs.len() + 1,
        }
    }

    pub fn ramp_options(&self) -> RampOptions {
        match self {
            CellStyle::Blocks { .. } => RampOptions::default(),
            CellStyle::Glyphs { .. } => RampOptions::glyphs(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShadeOptions {
    pub base_color: Color,
    /// Grid width in cells.
    pub columns: u32,
    /// Rows are divided by this; the effective cell's height:width ratio when unset.
    pub aspect_correction: Option<f32>,
    /// Overrides the style's natural cell width.
    pub cell_width: Option<u32>,
    /// Overrides the style's natural cell height.
    pub cell_height: Option<u32>,
    /// Bits kept per channel before grayscale conversion; 0 disables.
    pub posterize_bits: u8,
    pub style: CellStyle,
}

impl Default for ShadeOptions {
    fn default() -> Self {
        Self {
            base_color: Color::new(0x44, 0xcc, 0xaa),
            columns: 80,
            aspect_correction: None,
            cell_width: None,
            cell_height: None,
            posterize_bits: 0,
            style: CellStyle::Blocks { shades: 5, skip_background: true },
        }
    }
}

impl ShadeOptions {
    /// Reject configurations before any image work happens.
    pub fn validate(&self) -> Result<(), ShadeError> {
        let invalid = |message: String| Err(ShadeError::InvalidArgument(message));

        if self.columns == 0 {
            return invalid("width must be at least one cell".into());
        }
        if self.cell_width == Some(0) || self.cell_height == Some(0) {
            return invalid("cell dimensions must be at least one pixel".into());
        }
        if self.posterize_bits > MAX_POSTERIZE_BITS {
            return invalid(format!(
                "posterize bits must be within 0..={MAX_POSTERIZE_BITS}, got {}",
                self.posterize_bits
            ));
        }
        if let Some(aspect) = self.aspect_correction {
            if !aspect.is_finite() || aspect <= 0.0 {
                return invalid(format!("aspect ratio correction must be positive, got {aspect}"));
            }
        }
        match &self.style {
            CellStyle::Blocks { shades, .. } if *shades < ShadeRamp::MIN_SHADES => invalid(format!(
                "at least {} shades are required, got {shades}",
                ShadeRamp::MIN_SHADES
            )),
            CellStyle::Glyphs { glyphs, .. } if glyphs.is_empty() => {
                invalid("character set cannot be empty".into())
            },
            CellStyle::Glyphs { font, .. } if !font.size.is_finite() || font.size <= 0.0 => {
                invalid(format!("font size must be positive, got {}", font.size))
            },
            _ => Ok(()),
        }
    }

    pub fn ramp(&self) -> Result<ShadeRamp, ShadeError> {
        ShadeRamp::generate(self.base_color, self.style.total_shades(), self.style.ramp_options())
    }

    /// Cell size after applying explicit overrides to `natural`.
    pub fn cell_size(&self, natural: CellSize) -> CellSize {
        CellSize::new(
            self.cell_width.unwrap_or(natural.width).max(1),
            self.cell_height.unwrap_or(natural.height).max(1),
        )
    }
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub canvas: RgbImage,
    pub grid: LevelGrid,
    pub geometry: GridGeometry,
    pub cell: CellSize,
    pub ramp: ShadeRamp,
    pub report: RenderReport,
}

impl RenderOutput {
    /// Write the canvas as PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ShadeError> {
        let path = path.as_ref();
        self.canvas
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| ShadeError::Save { path: path.to_path_buf(), source })
    }
}

#[derive(Default)]
pub struct ShadeRenderer;

impl ShadeRenderer {
    pub fn render_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: &ShadeOptions,
    ) -> Result<RenderOutput, ShadeError> {
        options.validate()?;
        options.ramp()?;
        let image = load_source(path.as_ref())?;
        self.render_image(&image, options)
    }

    pub fn render_image(
        &self,
        image: &DynamicImage,
        options: &ShadeOptions,
    ) -> Result<RenderOutput, ShadeError> {
        options.validate()?;
        let ramp = options.ramp()?;
        debug!("shade ramp for {}: {:?}", options.base_color, ramp.shades());

        let (geometry, grid, canvas, cell, report) = match &options.style {
            CellStyle::Blocks { skip_background, .. } => {
                let cell = options.cell_size(DEFAULT_BLOCK_CELL);
                let (geometry, grid, mut canvas) = prepare(image, options, &ramp, cell)?;
                let report = raster::paint_blocks(&mut canvas, &grid, &ramp, *skip_background);
                (geometry, grid, canvas, cell, report)
            },
            CellStyle::Glyphs { glyphs, font, skip_blank } => {
                let painter = font.load();
                let cell = options.cell_size(painter.cell_size());
                let (geometry, grid, mut canvas) = prepare(image, options, &ramp, cell)?;
                let report = raster::paint_glyphs(
                    &mut canvas,
                    &grid,
                    &ramp,
                    glyphs,
                    painter.as_ref(),
                    *skip_blank,
                );
                (geometry, grid, canvas, cell, report)
            },
        };

        info!(
            "rendered {}x{} cells at {}x{} px: {} drawn, {} skipped, {} failed",
            geometry.columns,
            geometry.rows,
            cell.width,
            cell.height,
            report.drawn,
            report.skipped,
            report.failed
        );

        Ok(RenderOutput { canvas: canvas.into_image(), grid, geometry, cell, ramp, report })
    }

    /// Glyph rows for the quantized image, without rasterizing.
    pub fn preview_image(
        &self,
        image: &DynamicImage,
        options: &ShadeOptions,
    ) -> Result<Vec<String>, ShadeError> {
        options.validate()?;
        let CellStyle::Glyphs { glyphs, font, .. } = &options.style else {
            return Err(ShadeError::InvalidArgument("preview needs a character set".into()));
        };

        let aspect = match options.aspect_correction {
            Some(aspect) => aspect,
            None => options.cell_size(font.load().cell_size()).aspect(),
        };
        let geometry = layout(image, options, aspect)?;
        Ok(quantize(image, options, geometry).rows(glyphs).collect())
    }
}

/// Allocate a background-filled canvas for `image`, then quantize it.
fn prepare(
    image: &DynamicImage,
    options: &ShadeOptions,
    ramp: &ShadeRamp,
    cell: CellSize,
) -> Result<(GridGeometry, LevelGrid, Canvas), ShadeError> {
    let aspect = options.aspect_correction.unwrap_or_else(|| cell.aspect());
    let geometry = layout(image, options, aspect)?;
    // Oversized layouts fail here, before any resampling.
    let canvas = Canvas::new(geometry, cell, ramp.background())?;
    let grid = quantize(image, options, geometry);
    Ok((geometry, grid, canvas))
}

fn layout(image: &DynamicImage, options: &ShadeOptions, aspect: f32) -> Result<GridGeometry, ShadeError> {
    let (width, height) = image.dimensions();
    GridLayout::new(options.columns, aspect).derive(width, height).ok_or(ShadeError::InvalidLayout)
}

/// Brightness → grid → levels.
fn quantize(image: &DynamicImage, options: &ShadeOptions, geometry: GridGeometry) -> LevelGrid {
    let brightness = adjust::extract_brightness(image, options.posterize_bits);
    let cells = resize::downsample(&brightness, geometry);
    LevelMapper::new(options.style.levels()).map_brightness(&cells)
}
