//! Raster output through external SVG and image tools.

use std::path::Path;

use crate::tools::{self, ToolError};

/// Rasterize an SVG to a PNG at the given pixel size.
///
/// rsvg-convert renders the SVG, then ImageMagick convert flattens it
/// onto a black background padded to exactly `width x height`. The
/// intermediate file is removed in every case.
pub fn svg_to_png(svg: &Path, png: &Path, width: u32, height: u32) -> Result<(), ToolError> {
    let temp = png.with_extension("temp.png");

    let w = width.to_string();
    let h = height.to_string();
    let svg_arg = svg.display().to_string();
    let temp_arg = temp.display().to_string();
    let png_arg = png.display().to_string();

    let result = tools::run(
        "rsvg-convert",
        &["-w", &w, "-h", &h, &svg_arg, "-o", &temp_arg],
        &format!("rendering '{}'", svg.display()),
    )
    .and_then(|_| {
        let extent = format!("{}x{}", width, height);
        tools::run(
            "convert",
            &[
                &temp_arg,
                "-background",
                "black",
                "-flatten",
                "-extent",
                &extent,
                &png_arg,
            ],
            &format!("finalizing '{}'", png.display()),
        )
    });

    let _ = std::fs::remove_file(&temp);
    result
}
