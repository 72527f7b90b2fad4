//! RGB to brightness conversion.

/// Convert raw RGB pixel data to per-pixel brightness values.
///
/// Brightness is the plain channel average `(R + G + B) / 3`, computed
/// with integer math. Input is expected in row-major order with three
/// bytes per pixel; a trailing partial pixel is ignored.
///
/// # Returns
/// A vector of brightness values (0-255), one per pixel.
pub fn to_brightness(rgb: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgb.len() / 3);

    for px in rgb.chunks_exact(3) {
        let sum = px[0] as u32 + px[1] as u32 + px[2] as u32;
        out.push((sum / 3) as u8);
    }

    out
}
