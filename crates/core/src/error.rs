//! Error types for the LIC core.
//!
//! Only entry points (grid construction, parameter validation, render calls)
//! return errors. The per-pixel kernel absorbs every numeric anomaly locally.

use thiserror::Error;

/// Errors produced when building grids or starting a render.
#[derive(Debug, Error)]
pub enum LicError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Two grids (or a grid and an output buffer) had different shapes.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A strided view would address elements outside its backing slice.
    #[error(
        "invalid stride: {width}x{height} view with row stride {row_stride} and pixel stride \
         {pixel_stride} needs {required} elements, slice has {available}"
    )]
    InvalidStride {
        width: usize,
        height: usize,
        row_stride: usize,
        pixel_stride: usize,
        required: usize,
        available: usize,
    },

    /// A render parameter failed validation.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A render region did not fit inside the output.
    #[error("region ({x0}, {y0})..({x1}, {y1}) out of bounds for output of size ({width}, {height})")]
    RegionOutOfBounds {
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
        width: usize,
        height: usize,
    },
}
