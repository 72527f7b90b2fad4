//! Image decoding and conversion to character grids.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::ascii::{self, AsciiGrid};
use crate::render::OutputFormat;

/// Settings shared by the image and video pipelines.
#[derive(Debug, Clone)]
pub struct ConvertSettings {
    /// Downsampling factor; each output character covers `ratio x ratio`
    /// source pixels.
    pub ratio: u32,
    /// Font size in pixels for SVG and PNG output.
    pub font_size: u32,
    /// Output format for converted frames.
    pub format: OutputFormat,
    /// Directory that receives the final artifacts.
    pub output_dir: PathBuf,
}

/// Errors that can occur while converting a single image.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to read image '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Convert a decoded RGB image to a character grid.
///
/// The image is resized down to the grid dimensions first, so each
/// character summarizes a `ratio x ratio` block of source pixels.
pub fn grid_from_rgb(img: &RgbImage, ratio: u32) -> AsciiGrid {
    let (width, height) = img.dimensions();
    let (cols, rows) = ascii::grid_dimensions(width, height, ratio);

    let small = if (cols, rows) == (width, height) {
        img.clone()
    } else {
        imageops::resize(img, cols, rows, FilterType::CatmullRom)
    };

    let brightness = ascii::to_brightness(small.as_raw());
    AsciiGrid::new(cols, rows, ascii::map_to_chars(&brightness))
}

/// Load an image file and convert it to a character grid.
///
/// # Returns
/// The grid together with the source dimensions in pixels. The source
/// dimensions are the reference size for raster output.
pub fn grid_from_file(path: &Path, ratio: u32) -> Result<(AsciiGrid, (u32, u32)), ConvertError> {
    let img = image::open(path)
        .map_err(|source| ConvertError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let dims = img.dimensions();
    Ok((grid_from_rgb(&img, ratio), dims))
}
