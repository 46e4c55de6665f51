//! From a [`RenderSpec`] to rendered pixels.
//!
//! The field is rasterized once per call. Single images go through
//! [`render_spec`]; animations go through [`render_frames`], which steps the
//! weight window offset between frames so the streaks appear to flow.
//! With more than one thread, row bands are rendered on a rayon pool.

use lic_core::{
    AbortSignal, Grid, Lic, LicError, LicParams, NoiseField, OutputBand, OutputBuffer, Region,
    RenderOutcome, VectorField,
};
use rayon::prelude::*;

use crate::error::HarnessError;
use crate::sources::rasterize;
use crate::spec::RenderSpec;

/// Rasterized field and noise for one spec.
struct Inputs {
    x: Grid,
    y: Grid,
    noise: Box<dyn NoiseField>,
}

impl Inputs {
    fn prepare(spec: &RenderSpec, params: &LicParams) -> Result<Self, HarnessError> {
        let source = crate::build_field(
            &spec.field,
            spec.width,
            spec.height,
            spec.seed,
            &spec.field_params,
        )?;
        let (x, y) = rasterize(&*source, spec.width, spec.height)?;
        let noise = params.build_noise()?;
        Ok(Self { x, y, noise })
    }

    fn lic(&self, params: LicParams) -> Result<Lic<'_, dyn NoiseField>, LicError> {
        let field = VectorField::new(self.x.view(), self.y.view())?;
        Lic::new(field, &*self.noise, params)
    }
}

/// Renders `spec` into a fresh buffer.
///
/// `threads > 1` renders row bands on a pool of that many threads; the pixels
/// are identical to a single-threaded render.
#[tracing::instrument(
    skip_all,
    fields(field = %spec.field, width = spec.width, height = spec.height)
)]
pub fn render_spec(
    spec: &RenderSpec,
    threads: usize,
    abort: &(dyn AbortSignal + Sync),
) -> Result<(OutputBuffer, RenderOutcome), HarnessError> {
    spec.validate()?;
    let params = spec.lic_params()?;
    let inputs = Inputs::prepare(spec, &params)?;
    let lic = inputs.lic(params)?;
    let pool = build_thread_pool(threads)?;
    let mut out = OutputBuffer::new(spec.width, spec.height)?;
    let outcome = render_bands(&lic, &mut out, pool.as_ref(), abort)?;
    tracing::info!(?outcome, "render finished");
    Ok((out, outcome))
}

/// Renders `frames` images of `spec` with the weight window forced on, the
/// offset advancing by `offset_step` per frame from the spec's own offset.
///
/// Each completed frame is handed to `on_frame` with its index. An abort
/// stops the sequence before the interrupted frame is delivered. Returns the
/// number of frames delivered.
#[tracing::instrument(
    skip_all,
    fields(field = %spec.field, frames = frames, offset_step = offset_step)
)]
pub fn render_frames<F>(
    spec: &RenderSpec,
    frames: usize,
    offset_step: i64,
    threads: usize,
    abort: &(dyn AbortSignal + Sync),
    mut on_frame: F,
) -> Result<usize, HarnessError>
where
    F: FnMut(usize, &OutputBuffer) -> Result<(), HarnessError>,
{
    let mut spec = spec.clone();
    spec.lic.use_weight_window = true;
    spec.validate()?;
    let base = spec.lic_params()?;
    let inputs = Inputs::prepare(&spec, &base)?;
    let pool = build_thread_pool(threads)?;
    let mut out = OutputBuffer::new(spec.width, spec.height)?;

    let mut offset = base.window.offset;
    for index in 0..frames {
        let mut params = base;
        params.window.offset = offset;
        let lic = inputs.lic(params)?;
        out.clear();
        let outcome = render_bands(&lic, &mut out, pool.as_ref(), abort)?;
        if !outcome.is_complete() {
            tracing::info!(index, "animation aborted");
            return Ok(index);
        }
        on_frame(index, &out)?;
        tracing::debug!(index, offset, "frame rendered");
        offset = offset.wrapping_add(offset_step);
    }
    Ok(frames)
}

/// Bands per pool thread, so work stealing can even out slow rows.
const BANDS_PER_THREAD: usize = 4;

/// Pool for band rendering, or `None` when a single thread is requested.
fn build_thread_pool(threads: usize) -> Result<Option<rayon::ThreadPool>, HarnessError> {
    if threads <= 1 {
        return Ok(None);
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map(Some)
        .map_err(|e| HarnessError::ThreadPool(format!("failed to build rayon thread pool: {e}")))
}

/// Renders the whole of `out`, in row bands on `pool` when there is one.
///
/// After an abort, `rows_completed` counts finished rows across all bands;
/// they are not necessarily a prefix of the image.
fn render_bands(
    lic: &Lic<'_, dyn NoiseField>,
    out: &mut OutputBuffer,
    pool: Option<&rayon::ThreadPool>,
    abort: &(dyn AbortSignal + Sync),
) -> Result<RenderOutcome, LicError> {
    let Some(pool) = pool else {
        let region = Region::full(out.width(), out.height());
        return lic.render(out, region, abort);
    };
    let rows = out
        .height()
        .div_ceil(pool.current_num_threads() * BANDS_PER_THREAD)
        .max(1);
    let bands: Vec<OutputBand<'_>> = out.bands_mut(rows).collect();
    let results: Vec<Result<RenderOutcome, LicError>> = pool.install(|| {
        bands
            .into_par_iter()
            .map(|mut band| lic.render_band(&mut band, abort))
            .collect()
    });

    let mut total = 0;
    let mut aborted = false;
    for result in results {
        match result? {
            RenderOutcome::Completed { rows } => total += rows,
            RenderOutcome::Aborted { rows_completed } => {
                total += rows_completed;
                aborted = true;
            }
        }
    }
    Ok(if aborted {
        RenderOutcome::Aborted {
            rows_completed: total,
        }
    } else {
        RenderOutcome::Completed { rows: total }
    })
}
