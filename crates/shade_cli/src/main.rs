use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use shade_render::{
    load_source, CellStyle, Color, FontOptions, GlyphSet, ShadeOptions, ShadeRenderer,
    DEFAULT_FONT_SIZE,
};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render images as tinted block or glyph art")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill each cell with a solid shade of the base color
    Blocks(BlocksArgs),
    /// Draw one character per cell, tinted with a shade of the base color
    Glyphs(GlyphsArgs),
    /// Print the character grid to stdout for a quick look
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct Source {
    /// Input image, or a directory of images
    input: PathBuf,
    /// Base color the shades are derived from (e.g. '#44ccaa')
    color: Color,
}

#[derive(Args, Debug)]
struct BlocksArgs {
    #[command(flatten)]
    source: Source,
    /// Width of the output in cells
    #[arg(short, long, default_value_t = 80)]
    width: u32,
    /// Number of shades, background included
    #[arg(short, long, default_value_t = 5)]
    shades: usize,
    /// Width of each cell in pixels
    #[arg(long, default_value_t = 10)]
    cell_width: u32,
    /// Height of each cell in pixels
    #[arg(long, default_value_t = 16)]
    cell_height: u32,
    /// Cell height / cell width; rows are divided by it to keep the source
    /// proportions [default: cell_height / cell_width]
    #[arg(short, long)]
    aspect_ratio_correction: Option<f32>,
    /// Paint background cells instead of leaving the canvas bare
    #[arg(long)]
    no_skip_background: bool,
    /// Output PNG (or directory when the input is a directory)
    #[arg(short, long, default_value = "ascii_art_output.png")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct GlyphsArgs {
    #[command(flatten)]
    source: Source,
    /// Width of the output in characters
    #[arg(short, long, default_value_t = 80)]
    width: u32,
    /// Characters ordered sparse (dark areas) to dense (bright areas);
    /// quote it to keep the shell away from special characters
    #[arg(long, default_value = GlyphSet::STANDARD)]
    charset: String,
    #[command(flatten)]
    font: FontArgs,
    /// Cell width in pixels [default: measured from the font]
    #[arg(long)]
    cell_width: Option<u32>,
    /// Cell height in pixels [default: measured from the font]
    #[arg(long)]
    cell_height: Option<u32>,
    /// Cell height / cell width; 2.0 for cells twice as tall as wide
    /// [default: measured from the cell size]
    #[arg(short, long)]
    aspect_ratio_correction: Option<f32>,
    /// Keep this many bits per channel before sampling (1-8, 0 disables)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=8))]
    posterize_bits: u8,
    /// Draw a blank first character instead of letting the background show
    #[arg(long)]
    no_skip_blank: bool,
    /// Output PNG (or directory when the input is a directory)
    #[arg(short, long, default_value = "char_art_output.png")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// TrueType/OpenType font file; common monospaced fonts are tried otherwise
    #[arg(long, env = "SHADE_ART_FONT")]
    font_path: Option<PathBuf>,
    /// Font size in pixels per em
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f32,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Input image path
    input: PathBuf,
    /// Width of the preview in characters
    #[arg(short, long, default_value_t = 100)]
    width: u32,
    #[arg(long, default_value = GlyphSet::STANDARD)]
    charset: String,
    /// Terminal cell height / width
    #[arg(short, long, default_value_t = 2.0)]
    aspect_ratio_correction: f32,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=8))]
    posterize_bits: u8,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Blocks(args) => blocks(args),
        Commands::Glyphs(args) => glyphs(args),
        Commands::Preview(args) => preview(args),
    }
}

fn blocks(args: BlocksArgs) -> Result<()> {
    let options = args.to_options();
    run(&args.source.input, &args.output, &options, "ASCII-style art")
}

fn glyphs(args: GlyphsArgs) -> Result<()> {
    let options = args.to_options()?;
    run(&args.source.input, &args.output, &options, "ASCII-character style art")
}

fn preview(args: PreviewArgs) -> Result<()> {
    let options = ShadeOptions {
        columns: args.width,
        aspect_correction: Some(args.aspect_ratio_correction),
        posterize_bits: args.posterize_bits,
        style: CellStyle::Glyphs {
            glyphs: GlyphSet::new(args.charset)?,
            font: FontOptions::default(),
            skip_blank: true,
        },
        ..ShadeOptions::default()
    };
    options.validate()?;

    let image = load_source(&args.input)?;
    let rows = ShadeRenderer
        .preview_image(&image, &options)
        .with_context(|| format!("failed to render {:?}", args.input))?;
    for row in rows {
        println!("{}", row);
    }

    Ok(())
}

fn run(input: &Path, output: &Path, options: &ShadeOptions, label: &str) -> Result<()> {
    options.validate()?;
    options.ramp()?;

    if input.is_dir() {
        return convert_directory(input, output, options);
    }

    let rendered = ShadeRenderer
        .render_path(input, options)
        .with_context(|| format!("failed to render {:?}", input))?;
    rendered.save(output)?;
    println!("{label} saved to '{}'", output.display());
    Ok(())
}

fn convert_directory(input: &Path, out_dir: &Path, options: &ShadeOptions) -> Result<()> {
    let mut entries: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no files found in {:?}", input);
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {:?}", out_dir))?;

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )?
        .progress_chars("=> "),
    );

    let mut written = 0usize;
    for entry in &entries {
        progress.inc(1);
        let image = match load_source(entry) {
            Ok(image) => image,
            Err(err) => {
                progress.suspend(|| warn!("skipping {}: {err}", entry.display()));
                continue;
            },
        };

        let target = out_dir.join(output_name(input, entry));
        if let Err(err) = render_entry(&image, &target, options) {
            progress.suspend(|| warn!("failed to convert {}: {err:#}", entry.display()));
            continue;
        }
        written += 1;
    }

    progress.finish_and_clear();
    if written == 0 {
        anyhow::bail!("no images could be rendered from {:?}", input);
    }
    println!("{written} images saved to '{}'", out_dir.display());
    Ok(())
}

fn render_entry(image: &DynamicImage, target: &Path, options: &ShadeOptions) -> Result<()> {
    let rendered = ShadeRenderer.render_image(image, options)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {:?}", parent))?;
    }
    rendered.save(target)?;
    Ok(())
}

/// `<relative dir>/<stem>.png` for a file found under `root`.
fn output_name(root: &Path, entry: &Path) -> PathBuf {
    let relative = entry.strip_prefix(root).unwrap_or(entry);
    let mut name = relative.to_path_buf();
    name.set_extension("png");
    name
}

impl BlocksArgs {
    fn to_options(&self) -> ShadeOptions {
        ShadeOptions {
            base_color: self.source.color,
            columns: self.width,
            aspect_correction: self.aspect_ratio_correction,
            cell_width: Some(self.cell_width),
            cell_height: Some(self.cell_height),
            posterize_bits: 0,
            style: CellStyle::Blocks {
                shades: self.shades,
                skip_background: !self.no_skip_background,
            },
        }
    }
}

impl GlyphsArgs {
    fn to_options(&self) -> Result<ShadeOptions> {
        let glyphs = GlyphSet::new(self.charset.clone())?;
        Ok(ShadeOptions {
            base_color: self.source.color,
            columns: self.width,
            aspect_correction: self.aspect_ratio_correction,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            posterize_bits: self.posterize_bits,
            style: CellStyle::Glyphs {
                glyphs,
                font: self.font.to_options(),
                skip_blank: !self.no_skip_blank,
            },
        })
    }
}

impl FontArgs {
    fn to_options(&self) -> FontOptions {
        FontOptions { path: self.font_path.clone(), size: self.font_size, ..FontOptions::default() }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn blocks_defaults_match_the_classic_tool() {
        let cli = Cli::try_parse_from(["shade_cli", "blocks", "in.png", "#44ccaa"]).unwrap();
        let Commands::Blocks(args) = cli.command else { panic!("expected blocks") };
        let options = args.to_options();
        assert_eq!(options.columns, 80);
        assert_eq!(options.cell_size(shade_render::DEFAULT_BLOCK_CELL).width, 10);
        assert_eq!(options.style, CellStyle::Blocks { shades: 5, skip_background: true });
        assert_eq!(args.output, PathBuf::from("ascii_art_output.png"));
    }

    #[test]
    fn glyphs_parse_charset_and_font() {
        let cli = Cli::try_parse_from([
            "shade_cli",
            "glyphs",
            "in.png",
            "44ccaa",
            "--charset",
            " .#",
            "--font-size",
            "20",
            "--posterize-bits",
            "3",
        ])
        .unwrap();
        let Commands::Glyphs(args) = cli.command else { panic!("expected glyphs") };
        let options = args.to_options().unwrap();
        assert_eq!(options.posterize_bits, 3);
        assert_eq!(options.style.total_shades(), 4);
        let CellStyle::Glyphs { font, skip_blank, .. } = options.style else { unreachable!() };
        assert_eq!(font.size, 20.0);
        assert!(skip_blank);
    }

    #[test]
    fn bad_color_and_posterize_are_rejected() {
        assert!(Cli::try_parse_from(["shade_cli", "blocks", "in.png", "#zzzzzz"]).is_err());
        assert!(Cli::try_parse_from([
            "shade_cli",
            "glyphs",
            "in.png",
            "#000000",
            "--posterize-bits",
            "9"
        ])
        .is_err());
    }

    #[test]
    fn empty_charset_fails_before_rendering() {
        let cli =
            Cli::try_parse_from(["shade_cli", "glyphs", "in.png", "#000000", "--charset", ""])
                .unwrap();
        let Commands::Glyphs(args) = cli.command else { panic!("expected glyphs") };
        assert!(args.to_options().is_err());
    }

    #[test]
    fn output_names_mirror_the_input_tree() {
        let root = Path::new("/photos");
        assert_eq!(output_name(root, Path::new("/photos/a/cat.jpg")), PathBuf::from("a/cat.png"));
        assert_eq!(output_name(root, Path::new("/photos/dog.png")), PathBuf::from("dog.png"));
    }

    #[test]
    fn directories_render_every_decodable_image() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        image::GrayImage::from_pixel(8, 8, image::Luma([200])).save(input.path().join("a.png")).unwrap();
        fs::write(input.path().join("notes.txt"), "not an image").unwrap();

        let options = ShadeOptions { columns: 2, ..ShadeOptions::default() };
        convert_directory(input.path(), output.path(), &options).unwrap();

        assert!(output.path().join("a.png").is_file());
        assert!(!output.path().join("notes.png").exists());
    }

    #[test]
    fn one_failed_render_does_not_stop_the_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        // At this correction the tall image needs more rows than a canvas can hold.
        image::GrayImage::from_pixel(1, 1000, image::Luma([90])).save(input.path().join("a.png")).unwrap();
        image::GrayImage::from_pixel(10_000, 1, image::Luma([200])).save(input.path().join("b.png")).unwrap();

        let options =
            ShadeOptions { columns: 1, aspect_correction: Some(1e-6), ..ShadeOptions::default() };
        convert_directory(input.path(), output.path(), &options).unwrap();

        assert!(!output.path().join("a.png").exists());
        assert!(output.path().join("b.png").is_file());
    }

    #[test]
    fn batch_fails_when_nothing_renders() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        image::GrayImage::from_pixel(1, 1000, image::Luma([90])).save(input.path().join("a.png")).unwrap();

        let options =
            ShadeOptions { columns: 1, aspect_correction: Some(1e-6), ..ShadeOptions::default() };
        assert!(convert_directory(input.path(), output.path(), &options).is_err());
    }

    #[test]
    fn preview_defaults_to_cells_twice_as_tall() {
        let cli = Cli::try_parse_from(["shade_cli", "preview", "in.png"]).unwrap();
        let Commands::Preview(args) = cli.command else { panic!("expected preview") };
        assert_eq!(args.aspect_ratio_correction, 2.0);
        assert_eq!(args.width, 100);
    }
}
