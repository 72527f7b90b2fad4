//! Brightness to character mapping over the fixed output ramp.

/// The 16-level character ramp used for all output.
/// Characters ordered from darkest (space) to brightest (caret).
pub const RAMP: &[char] = &[
    ' ', '.', ':', ';', ',', '*', 'o', '8', '#', '&', '%', '@', '$', '=', '+', '^',
];

/// Map a brightness value (0-255) to an index into [`RAMP`].
///
/// Dividing by 256 instead of 255 keeps every bucket exactly 16 values
/// wide; the clamp guards the 255 edge should the ramp length change.
#[inline]
pub fn ramp_index(brightness: u8) -> usize {
    let idx = brightness as usize * RAMP.len() / 256;
    idx.min(RAMP.len() - 1)
}

/// Map brightness values to ramp characters, one character per value.
///
/// Lower brightness maps to earlier characters (darker/less dense),
/// higher brightness to later characters (brighter/denser).
pub fn map_to_chars(brightness: &[u8]) -> Vec<char> {
    brightness.iter().map(|&b| RAMP[ramp_index(b)]).collect()
}
