//! Output writers for converted grids.
//!
//! Three formats are supported: plain text, SVG markup, and PNG
//! rasterized from the SVG through external tools.

mod raster;
mod svg;
mod text;

pub use raster::svg_to_png;
pub use svg::{svg_document, write_svg};
pub use text::write_text;

use std::path::{Path, PathBuf};

use crate::ascii::AsciiGrid;
use crate::tools::ToolError;

/// Output format for converted media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text grid, one line per row
    #[default]
    Text,
    /// SVG markup, one text element per cell
    Svg,
    /// PNG rasterized from the SVG at the source dimensions
    Png,
}

impl OutputFormat {
    /// Look up a format by its config-file name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "svg" => Some(OutputFormat::Svg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }

    /// Get a human-readable name for the format.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors that can occur while writing output artifacts.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Write one converted grid into `dir` in the requested format.
///
/// For [`OutputFormat::Png`] an intermediate SVG is written next to the
/// final file, rasterized at `ref_size` pixels, and removed again.
///
/// # Returns
/// The path of the final artifact.
pub fn render_grid(
    grid: &AsciiGrid,
    dir: &Path,
    stem: &str,
    format: OutputFormat,
    font_size: u32,
    ref_size: (u32, u32),
) -> Result<PathBuf, RenderError> {
    match format {
        OutputFormat::Text => {
            let path = dir.join(format!("{}.txt", stem));
            write_text(grid, &path).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(path)
        }
        OutputFormat::Svg => {
            let path = dir.join(format!("{}.svg", stem));
            write_svg(grid, font_size, &path).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(path)
        }
        OutputFormat::Png => {
            let svg_path = dir.join(format!("{}.svg", stem));
            let png_path = dir.join(format!("{}.png", stem));
            write_svg(grid, font_size, &svg_path).map_err(|source| RenderError::Io {
                path: svg_path.clone(),
                source,
            })?;
            let result = svg_to_png(&svg_path, &png_path, ref_size.0, ref_size.1);
            let _ = std::fs::remove_file(&svg_path);
            result?;
            Ok(png_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_round_trip() {
        for format in [OutputFormat::Text, OutputFormat::Svg, OutputFormat::Png] {
            assert_eq!(OutputFormat::from_name(format.name()), Some(format));
        }
    }

    #[test]
    fn test_format_from_unknown_name() {
        assert_eq!(OutputFormat::from_name("bmp"), None);
        assert_eq!(OutputFormat::from_name(""), None);
    }

    #[test]
    fn test_default_format_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
