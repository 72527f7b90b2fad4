//! Character grid type and grid sizing.

/// Compute the character grid dimensions for a source image.
///
/// Each grid cell covers `ratio x ratio` source pixels. Dimensions are
/// clamped so a ratio larger than the image still yields one cell.
///
/// # Returns
/// `(columns, rows)` of the resulting grid.
pub fn grid_dimensions(width: u32, height: u32, ratio: u32) -> (u32, u32) {
    let ratio = ratio.max(1);
    ((width / ratio).max(1), (height / ratio).max(1))
}

/// A rectangular grid of ramp characters in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiGrid {
    cols: u32,
    rows: u32,
    chars: Vec<char>,
}

impl AsciiGrid {
    /// Build a grid from row-major character data.
    ///
    /// `chars.len()` must equal `cols * rows`.
    pub fn new(cols: u32, rows: u32, chars: Vec<char>) -> Self {
        debug_assert_eq!(chars.len(), (cols as usize) * (rows as usize));
        AsciiGrid { cols, rows, chars }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Iterate over the grid one row at a time.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[char]> {
        self.chars.chunks_exact(self.cols as usize)
    }

    /// Render the grid as plain text, one line per row with a trailing
    /// newline.
    pub fn to_text(&self) -> String {
        let capacity = (self.cols as usize + 1) * self.rows as usize;
        let mut out = String::with_capacity(capacity);
        for row in self.iter_rows() {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}
