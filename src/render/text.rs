//! Plain text output.

use std::io;
use std::path::Path;

use crate::ascii::AsciiGrid;

/// Write a grid as plain text, one line per row.
pub fn write_text(grid: &AsciiGrid, path: &Path) -> io::Result<()> {
    std::fs::write(path, grid.to_text())
}
