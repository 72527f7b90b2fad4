//! SVG markup output.

use std::io;
use std::path::Path;

use crate::ascii::AsciiGrid;

// The ramp contains '&', which is not legal as raw XML text.
fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
    }
}

/// Build the SVG document for a grid.
///
/// One `<text>` element per cell, white on a black background. Cell
/// `(x, y)` is placed at `(x * font_size, (y + 1) * font_size)` so the
/// first row's baseline sits one font size below the top edge. The
/// document size is the grid size scaled by the font size.
pub fn svg_document(grid: &AsciiGrid, font_size: u32) -> String {
    let width = grid.cols() * font_size;
    let height = grid.rows() * font_size;

    let cells = (grid.cols() as usize) * (grid.rows() as usize);
    let mut out = String::with_capacity(cells * 96 + 256);

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
         width=\"{}\" height=\"{}\" style=\"background-color:black\">",
        width, height
    ));

    for (y, row) in grid.iter_rows().enumerate() {
        for (x, &c) in row.iter().enumerate() {
            out.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-family=\"Arial\" font-size=\"{}\" fill=\"white\">",
                x as u32 * font_size,
                (y as u32 + 1) * font_size,
                font_size
            ));
            push_escaped(&mut out, c);
            out.push_str("</text>");
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Write a grid as an SVG file.
pub fn write_svg(grid: &AsciiGrid, font_size: u32, path: &Path) -> io::Result<()> {
    std::fs::write(path, svg_document(grid, font_size))
}
