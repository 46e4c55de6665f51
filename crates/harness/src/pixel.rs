//! Pure-computation RGBA8 conversion of an [`OutputBuffer`].
//!
//! Always available (no feature gate) so callers without the `png` feature
//! can still hand the bytes to their own image sink.

use lic_core::{OutputBuffer, OutputPixel};

/// Quantises a unit-range value to a byte.
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// RGBA bytes of one pixel: grey value replicated into RGB, alpha into A.
///
/// Untouched cells become transparent black.
pub fn pixel_to_rgba(p: OutputPixel) -> [u8; 4] {
    if p.is_untouched() {
        return [0; 4];
    }
    let v = to_byte(p.value);
    [v, v, v, to_byte(p.alpha)]
}

/// Converts the whole buffer to row-major RGBA8, `width * height * 4` bytes.
pub fn output_to_rgba(out: &OutputBuffer) -> Vec<u8> {
    out.pixels()
        .iter()
        .flat_map(|&p| pixel_to_rgba(p))
        .collect()
}
