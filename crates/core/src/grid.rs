//! Two-dimensional `f32` grids and the vector field built from them.
//!
//! [`Grid`] owns a packed row-major buffer. [`GridView`] borrows any buffer
//! with explicit row and pixel strides, so a host can hand over one channel of
//! an interleaved RGBA image without copying. Out-of-range reads through a
//! view clamp each axis to the nearest edge cell; there is no wrap or mirror.

use glam::Vec2;

use crate::error::LicError;
use crate::sampler::{self, Interpolation};

/// Validates dimensions and returns `width * height`.
fn cell_count(width: usize, height: usize) -> Result<usize, LicError> {
    if width == 0 || height == 0 {
        return Err(LicError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(LicError::InvalidDimensions)
}

/// An owned, packed row-major grid of `f32` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Grid {
    /// Creates a zero-filled grid.
    ///
    /// Returns `LicError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, LicError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a grid with every cell set to `value`. NaN is stored as-is.
    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self, LicError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Creates a grid from a packed row-major vector, validating its length.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> Result<Self, LicError> {
        let expected = cell_count(width, height)?;
        if data.len() != expected {
            return Err(LicError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the row-major data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the row-major data.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Gets the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.data[y * self.width + x]
    }

    /// Sets the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.data[y * self.width + x] = value;
    }

    /// Borrows the grid as a packed [`GridView`].
    pub fn view(&self) -> GridView<'_> {
        GridView {
            data: &self.data,
            width: self.width,
            height: self.height,
            row_stride: self.width,
            pixel_stride: 1,
        }
    }
}

/// A borrowed, stride-aware, read-only 2D view over `f32` cells.
///
/// Cell `(x, y)` lives at `data[y * row_stride + x * pixel_stride]`.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    data: &'a [f32],
    width: usize,
    height: usize,
    row_stride: usize,
    pixel_stride: usize,
}

impl<'a> GridView<'a> {
    /// Views a packed row-major slice of exactly `width * height` cells.
    pub fn packed(data: &'a [f32], width: usize, height: usize) -> Result<Self, LicError> {
        let expected = cell_count(width, height)?;
        if data.len() != expected {
            return Err(LicError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Self::strided(data, width, height, width, 1)
    }

    /// Views `data` with explicit strides (in elements, not bytes).
    ///
    /// Fails if a stride is too small for the shape or if the last addressed
    /// element lies beyond the end of `data`.
    pub fn strided(
        data: &'a [f32],
        width: usize,
        height: usize,
        row_stride: usize,
        pixel_stride: usize,
    ) -> Result<Self, LicError> {
        cell_count(width, height)?;
        let stride_error = |required: usize| LicError::InvalidStride {
            width,
            height,
            row_stride,
            pixel_stride,
            required,
            available: data.len(),
        };
        let row_span = (width - 1)
            .checked_mul(pixel_stride)
            .and_then(|v| v.checked_add(1))
            .ok_or_else(|| stride_error(usize::MAX))?;
        if pixel_stride == 0 || row_stride < row_span {
            return Err(stride_error(row_span));
        }
        let required = (height - 1)
            .checked_mul(row_stride)
            .and_then(|v| v.checked_add(row_span))
            .ok_or_else(|| stride_error(usize::MAX))?;
        if required > data.len() {
            return Err(stride_error(required));
        }
        Ok(Self {
            data,
            width,
            height,
            row_stride,
            pixel_stride,
        })
    }

    /// Views one channel of an interleaved, tightly packed multi-channel image.
    pub fn channel(
        data: &'a [f32],
        width: usize,
        height: usize,
        channels: usize,
        channel: usize,
    ) -> Result<Self, LicError> {
        if channel >= channels {
            return Err(LicError::InvalidParameter {
                name: "channel",
                reason: format!("channel {channel} does not exist in a {channels}-channel image"),
            });
        }
        let row_stride = width
            .checked_mul(channels)
            .ok_or(LicError::InvalidDimensions)?;
        Self::strided(&data[channel.min(data.len())..], width, height, row_stride, channels)
    }

    /// View width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// View height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads cell `(x, y)` after clamping each axis into `[0, dim - 1]`.
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let xi = x.clamp(0, self.width as i64 - 1) as usize;
        let yi = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[yi * self.row_stride + xi * self.pixel_stride]
    }
}

/// A 2D vector field given as separate X and Y component grids.
#[derive(Debug, Clone, Copy)]
pub struct VectorField<'a> {
    x: GridView<'a>,
    y: GridView<'a>,
}

impl<'a> VectorField<'a> {
    /// Pairs two component views.
    ///
    /// Returns `LicError::DimensionMismatch` if their shapes differ.
    pub fn new(x: GridView<'a>, y: GridView<'a>) -> Result<Self, LicError> {
        if x.width != y.width || x.height != y.height {
            return Err(LicError::DimensionMismatch {
                lhs_w: x.width,
                lhs_h: x.height,
                rhs_w: y.width,
                rhs_h: y.height,
            });
        }
        Ok(Self { x, y })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.x.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.x.height
    }

    /// The X component view.
    pub fn x(&self) -> GridView<'a> {
        self.x
    }

    /// The Y component view.
    pub fn y(&self) -> GridView<'a> {
        self.y
    }

    /// Samples the vector at a continuous position, edge-clamped.
    pub fn sample(&self, x: f32, y: f32, interpolation: Interpolation) -> Vec2 {
        Vec2::new(
            sampler::sample(&self.x, x, y, interpolation),
            sampler::sample(&self.y, x, y, interpolation),
        )
    }
}

/// True if `v` cannot give a direction: both components exactly zero, or any
/// component NaN.
pub fn is_degenerate(v: Vec2) -> bool {
    (v.x == 0.0 && v.y == 0.0) || v.x.is_nan() || v.y.is_nan()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Grid --

    #[test]
    fn new_creates_zero_filled_grid() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.data().len(), 12);
        assert!(grid.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(Grid::new(0, 5), Err(LicError::InvalidDimensions)));
        assert!(matches!(Grid::new(5, 0), Err(LicError::InvalidDimensions)));
        assert!(Grid::filled(0, 0, 1.0).is_err());
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        assert!(Grid::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn filled_keeps_nan() {
        let grid = Grid::filled(2, 2, f32::NAN).unwrap();
        assert!(grid.data().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn from_data_rejects_wrong_length() {
        let result = Grid::from_data(2, 2, vec![0.0; 3]);
        assert!(matches!(result, Err(LicError::DimensionMismatch { .. })));
    }

    #[test]
    fn get_after_set_round_trips() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(2, 1, -4.5);
        assert_eq!(grid.get(2, 1), -4.5);
        assert_eq!(grid.data()[5], -4.5);
    }

    #[test]
    #[should_panic]
    fn get_out_of_bounds_panics() {
        Grid::new(2, 2).unwrap().get(2, 0);
    }

    // -- GridView --

    #[test]
    fn packed_view_matches_grid_cells() {
        let grid = Grid::from_data(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let view = grid.view();
        assert_eq!(view.get_clamped(0, 0), 0.0);
        assert_eq!(view.get_clamped(2, 0), 2.0);
        assert_eq!(view.get_clamped(1, 1), 4.0);
    }

    #[test]
    fn get_clamped_clamps_each_axis_independently() {
        let grid = Grid::from_data(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let view = grid.view();
        assert_eq!(view.get_clamped(-7, 0), 0.0);
        assert_eq!(view.get_clamped(99, 0), 2.0);
        assert_eq!(view.get_clamped(1, -3), 1.0);
        assert_eq!(view.get_clamped(1, 40), 4.0);
        assert_eq!(view.get_clamped(-1, 40), 3.0);
        assert_eq!(view.get_clamped(i64::MAX, i64::MIN), 2.0);
    }

    #[test]
    fn packed_view_rejects_wrong_length() {
        let data = [0.0_f32; 5];
        assert!(GridView::packed(&data, 2, 2).is_err());
    }

    #[test]
    fn strided_view_skips_row_padding() {
        // 2x2 grid with one padding element per row.
        let data = [1.0, 2.0, -1.0, 3.0, 4.0, -1.0];
        let view = GridView::strided(&data, 2, 2, 3, 1).unwrap();
        assert_eq!(view.get_clamped(0, 1), 3.0);
        assert_eq!(view.get_clamped(1, 1), 4.0);
    }

    #[test]
    fn strided_view_without_trailing_padding_is_accepted() {
        // Last row may stop right after its last cell.
        let data = [1.0, 2.0, -1.0, 3.0, 4.0];
        let view = GridView::strided(&data, 2, 2, 3, 1).unwrap();
        assert_eq!(view.get_clamped(1, 1), 4.0);
    }

    #[test]
    fn strided_view_rejects_short_slice() {
        let data = [0.0_f32; 4];
        let result = GridView::strided(&data, 2, 2, 3, 1);
        assert!(matches!(result, Err(LicError::InvalidStride { required: 5, .. })));
    }

    #[test]
    fn strided_view_rejects_overlapping_rows() {
        let data = [0.0_f32; 16];
        assert!(GridView::strided(&data, 4, 2, 3, 1).is_err());
        assert!(GridView::strided(&data, 4, 2, 4, 0).is_err());
    }

    #[test]
    fn channel_view_reads_interleaved_rgba() {
        // 2x1 RGBA image: pixel 0 = (1, 2, 3, 4), pixel 1 = (5, 6, 7, 8).
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let red = GridView::channel(&data, 2, 1, 4, 0).unwrap();
        let alpha = GridView::channel(&data, 2, 1, 4, 3).unwrap();
        assert_eq!(red.get_clamped(0, 0), 1.0);
        assert_eq!(red.get_clamped(1, 0), 5.0);
        assert_eq!(alpha.get_clamped(1, 0), 8.0);
    }

    #[test]
    fn channel_view_rejects_missing_channel() {
        let data = [0.0_f32; 8];
        assert!(GridView::channel(&data, 2, 1, 4, 4).is_err());
    }

    // -- VectorField --

    #[test]
    fn vector_field_rejects_mismatched_components() {
        let a = Grid::new(4, 4).unwrap();
        let b = Grid::new(4, 5).unwrap();
        let result = VectorField::new(a.view(), b.view());
        assert!(matches!(result, Err(LicError::DimensionMismatch { .. })));
    }

    #[test]
    fn vector_field_samples_both_components() {
        let gx = Grid::filled(2, 2, 1.5).unwrap();
        let gy = Grid::filled(2, 2, -0.5).unwrap();
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        assert_eq!(field.width(), 2);
        assert_eq!(field.height(), 2);
        let v = field.sample(0.7, 1.2, Interpolation::Nearest);
        assert_eq!(v, Vec2::new(1.5, -0.5));
    }

    #[test]
    fn degeneracy_covers_zero_and_nan() {
        assert!(is_degenerate(Vec2::ZERO));
        assert!(is_degenerate(Vec2::new(f32::NAN, f32::NAN)));
        assert!(is_degenerate(Vec2::new(f32::NAN, 1.0)));
        assert!(!is_degenerate(Vec2::new(0.0, 1e-30)));
        assert!(!is_degenerate(Vec2::new(-2.0, 0.0)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clamped_reads_never_leave_the_grid(
                w in 1_usize..=16,
                h in 1_usize..=16,
                x in any::<i64>(),
                y in any::<i64>(),
            ) {
                let data: Vec<f32> = (0..w * h).map(|i| i as f32).collect();
                let grid = Grid::from_data(w, h, data).unwrap();
                let v = grid.view().get_clamped(x, y);
                let xi = x.clamp(0, w as i64 - 1) as usize;
                let yi = y.clamp(0, h as i64 - 1) as usize;
                prop_assert_eq!(v, grid.get(xi, yi));
            }
        }
    }
}
