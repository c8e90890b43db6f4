//! Font selection: an explicit file, then well-known monospaced fonts found
//! under the font directories, then the built-in bitmap font.

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use super::bitmap::BitmapFont;
use super::outline::OutlineFont;
use super::GlyphPainter;

pub const DEFAULT_FONT_SIZE: f32 = 15.0;

/// Monospaced fonts tried in order when no explicit font is given.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "DejaVuSansMono.ttf",
    "consola.ttf",
    "cour.ttf",
    "Menlo.ttc",
    "LiberationMono-Regular.ttf",
];

#[derive(Clone, Debug, PartialEq)]
pub struct FontOptions {
    /// Font file to try before any candidate.
    pub path: Option<PathBuf>,
    /// Pixels per em.
    pub size: f32,
    /// File names searched for under `search_dirs`, in priority order.
    pub candidates: Vec<String>,
    pub search_dirs: Vec<PathBuf>,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            path: None,
            size: DEFAULT_FONT_SIZE,
            candidates: DEFAULT_CANDIDATES.iter().map(|name| name.to_string()).collect(),
            search_dirs: system_font_dirs(),
        }
    }
}

impl FontOptions {
    /// First font in the chain that loads. Never fails.
    pub fn load(&self) -> Box<dyn GlyphPainter> {
        if let Some(path) = &self.path {
            match OutlineFont::from_path(path, self.size) {
                Ok(font) => {
                    info!("using font {}", path.display());
                    return Box::new(font);
                },
                Err(err) => warn!("could not load font {}: {err}", path.display()),
            }
        }

        for name in &self.candidates {
            let Some(path) = find_font_file(&self.search_dirs, name) else {
                debug!("font {name} not found");
                continue;
            };
            match OutlineFont::from_path(&path, self.size) {
                Ok(font) => {
                    info!("using font {}", path.display());
                    return Box::new(font);
                },
                Err(err) => debug!("skipping font {}: {err}", path.display()),
            }
        }

        warn!("no monospaced font could be loaded, falling back to the built-in bitmap font");
        Box::new(BitmapFont::new(self.size))
    }
}

/// Directories commonly holding installed fonts on Linux, macOS and Windows.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
    ];

    if let Some(home) = env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }

    if let Some(windir) = env::var_os("WINDIR") {
        dirs.push(Path::new(&windir).join("Fonts"));
    }

    dirs
}

/// Find a file called `name` (case-insensitively) beneath any of `dirs`.
pub fn find_font_file(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter().filter(|dir| dir.is_dir()).find_map(|dir| {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| entry.file_name().eq_ignore_ascii_case(name))
            .map(|entry| entry.into_path())
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::raster::canvas::CellSize;

    fn isolated(dir: &Path) -> FontOptions {
        FontOptions { search_dirs: vec![dir.to_path_buf()], ..FontOptions::default() }
    }

    #[test]
    fn finds_nested_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype/dejavu");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("dejavusansmono.TTF"), b"").unwrap();

        let found = find_font_file(&[dir.path().to_path_buf()], "DejaVuSansMono.ttf");
        assert_eq!(found, Some(nested.join("dejavusansmono.TTF")));
    }

    #[test]
    fn missing_dirs_are_ignored() {
        let dirs = vec![PathBuf::from("/definitely/not/a/font/dir")];
        assert_eq!(find_font_file(&dirs, "anything.ttf"), None);
    }

    #[test]
    fn empty_search_falls_back_to_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let painter = isolated(dir.path()).load();
        assert_eq!(painter.name(), "built-in 8x8 bitmap");
        assert_eq!(painter.cell_size(), CellSize::new(16, 16));
    }

    #[test]
    fn broken_candidates_and_explicit_path_fall_through() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("DejaVuSansMono.ttf"), b"corrupt").unwrap();

        let options = FontOptions {
            path: Some(dir.path().join("missing.ttf")),
            size: 8.0,
            ..isolated(dir.path())
        };
        let painter = options.load();
        assert_eq!(painter.name(), "built-in 8x8 bitmap");
        assert_eq!(painter.cell_size(), CellSize::new(8, 8));
    }
}
