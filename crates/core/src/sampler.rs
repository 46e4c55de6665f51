//! Continuous-coordinate sampling of a [`GridView`].
//!
//! Both policies keep the edge-clamp boundary: a coordinate outside the grid
//! reads the nearest edge cell, never an invented value.

use crate::grid::GridView;

/// How a continuous coordinate maps onto grid cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Truncate toward zero, then clamp. Matches per-pixel host sampling.
    #[default]
    Nearest,
    /// Blend the four surrounding cells; every tap is edge-clamped.
    Bilinear,
}

impl Interpolation {
    /// All policies, for listings.
    pub const ALL: [Interpolation; 2] = [Interpolation::Nearest, Interpolation::Bilinear];

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
        }
    }
}

/// Samples `view` at `(x, y)` with the given policy.
pub fn sample(view: &GridView<'_>, x: f32, y: f32, interpolation: Interpolation) -> f32 {
    match interpolation {
        Interpolation::Nearest => sample_nearest(view, x, y),
        Interpolation::Bilinear => sample_bilinear(view, x, y),
    }
}

/// Nearest-cell sample: truncation toward zero, then per-axis clamp.
///
/// `as i64` saturates for huge values and maps NaN to 0, so every input reads
/// a valid cell.
pub fn sample_nearest(view: &GridView<'_>, x: f32, y: f32) -> f32 {
    view.get_clamped(x as i64, y as i64)
}

/// Bilinear sample over the 2x2 neighbourhood with edge-clamped taps.
///
/// Taps carrying zero weight are skipped, so sampling exactly on a cell
/// returns that cell even when a neighbour holds NaN.
pub fn sample_bilinear(view: &GridView<'_>, x: f32, y: f32) -> f32 {
    if !x.is_finite() || !y.is_finite() {
        return sample_nearest(view, x, y);
    }
    let fx = x.floor();
    let fy = y.floor();
    let tx = x - fx;
    let ty = y - fy;
    let ix = fx as i64;
    let iy = fy as i64;

    let row = |yy: i64| {
        let left = view.get_clamped(ix, yy);
        if tx == 0.0 {
            left
        } else {
            lerp(left, view.get_clamped(ix.saturating_add(1), yy), tx)
        }
    };

    let top = row(iy);
    if ty == 0.0 {
        top
    } else {
        lerp(top, row(iy.saturating_add(1)), ty)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
