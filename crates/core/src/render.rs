//! Row-by-row render driver with cooperative abort.
//!
//! [`Lic::render`] fills a region of an [`OutputBuffer`];
//! [`Lic::render_band`] fills one [`OutputBand`], which lets callers split a
//! buffer with [`OutputBuffer::bands_mut`] and hand bands to their own
//! threads. The abort signal is polled once before every row.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::LicError;
use crate::kernel::Lic;
use crate::noise::NoiseField;
use crate::output::{OutputBand, OutputBuffer, Region};

/// Externally owned cancellation flag.
pub trait AbortSignal {
    /// True once the render should stop writing rows.
    fn should_abort(&self) -> bool;
}

/// Never aborts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAbort;

impl AbortSignal for NeverAbort {
    fn should_abort(&self) -> bool {
        false
    }
}

impl AbortSignal for AtomicBool {
    fn should_abort(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<F: Fn() -> bool> AbortSignal for F {
    fn should_abort(&self) -> bool {
        self()
    }
}

/// How a render call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every row of the region was written.
    Completed { rows: usize },
    /// The abort signal fired; rows from `rows_completed` on were not touched.
    Aborted { rows_completed: usize },
}

impl RenderOutcome {
    /// True for [`RenderOutcome::Completed`].
    pub fn is_complete(&self) -> bool {
        matches!(self, RenderOutcome::Completed { .. })
    }
}

impl<N: NoiseField + ?Sized> Lic<'_, N> {
    fn check_output(&self, width: usize, height: usize) -> Result<(), LicError> {
        let field = self.field();
        if width != field.width() || height != field.height() {
            return Err(LicError::DimensionMismatch {
                lhs_w: field.width(),
                lhs_h: field.height(),
                rhs_w: width,
                rhs_h: height,
            });
        }
        Ok(())
    }

    /// Renders `region` of `out`.
    ///
    /// `out` must match the vector field's dimensions and `region` must fit
    /// inside it; both are checked before any pixel is written. Cells outside
    /// `region` are never written.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(x0 = region.x0, y0 = region.y0, x1 = region.x1, y1 = region.y1)
    )]
    pub fn render(
        &self,
        out: &mut OutputBuffer,
        region: Region,
        abort: &dyn AbortSignal,
    ) -> Result<RenderOutcome, LicError> {
        self.check_output(out.width(), out.height())?;
        region.check_within(out.width(), out.height())?;
        let mut band = out.as_band();
        Ok(self.render_rows(&mut band, region, abort))
    }

    /// Renders every pixel of `band`.
    #[tracing::instrument(level = "debug", skip_all, fields(y0 = band.y0(), rows = band.rows()))]
    pub fn render_band(
        &self,
        band: &mut OutputBand<'_>,
        abort: &dyn AbortSignal,
    ) -> Result<RenderOutcome, LicError> {
        let field = self.field();
        if band.width() != field.width() {
            return Err(LicError::DimensionMismatch {
                lhs_w: field.width(),
                lhs_h: field.height(),
                rhs_w: band.width(),
                rhs_h: band.rows(),
            });
        }
        let region = band.region();
        region.check_within(field.width(), field.height())?;
        Ok(self.render_rows(band, region, abort))
    }

    fn render_rows(
        &self,
        band: &mut OutputBand<'_>,
        region: Region,
        abort: &dyn AbortSignal,
    ) -> RenderOutcome {
        if region.is_empty() {
            return RenderOutcome::Completed { rows: 0 };
        }
        for (rows_completed, y) in (region.y0..region.y1).enumerate() {
            if abort.should_abort() {
                tracing::debug!(rows_completed, "render aborted");
                return RenderOutcome::Aborted { rows_completed };
            }
            let row = band.row_mut(y);
            for x in region.x0..region.x1 {
                row[x] = self.pixel(x, y);
            }
        }
        RenderOutcome::Completed {
            rows: region.height(),
        }
    }
}
