//! Pixel to ASCII character conversion.
//!
//! This module provides the core pipeline for turning decoded pixel data
//! into a character grid:
//!
//! 1. **Grid sizing** - One cell per `ratio x ratio` pixel block
//! 2. **Brightness** - RGB to channel-average brightness
//! 3. **Character mapping** - Brightness to the fixed 16-level ramp

mod brightness;
mod grid;
mod ramp;

pub use brightness::to_brightness;
pub use grid::{grid_dimensions, AsciiGrid};
pub use ramp::{map_to_chars, ramp_index, RAMP};
