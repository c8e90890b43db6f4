use std::path::Path;

use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::ShadeError;

/// Decode the source image at `path`.
pub fn load_source(path: &Path) -> Result<DynamicImage, ShadeError> {
    let image = image::open(path)
        .map_err(|source| ShadeError::Load { path: path.to_path_buf(), source })?;
    let (w, h) = image.dimensions();
    debug!("loaded source image {}x{} from {}", w, h, path.display());
    Ok(image)
}
