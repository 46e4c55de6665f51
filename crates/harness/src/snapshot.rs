//! PNG export of rendered buffers.
//!
//! Feature-gated behind `png` (default on) so that library users who only
//! want pixels do not pull in the `image` crate. The byte conversion lives in
//! [`crate::pixel`].

use lic_core::{AbortSignal, OutputBuffer};
use std::path::{Path, PathBuf};

use crate::error::HarnessError;
use crate::pipeline::render_frames;
use crate::pixel::output_to_rgba;
use crate::spec::RenderSpec;

/// Writes a buffer as an RGBA PNG.
///
/// Returns `HarnessError::InvalidSpec` if the dimensions overflow `u32`, or
/// `HarnessError::Io` on write failure.
pub fn write_png(out: &OutputBuffer, path: &Path) -> Result<(), HarnessError> {
    let rgba = output_to_rgba(out);
    let w = u32::try_from(out.width())
        .map_err(|_| HarnessError::InvalidSpec("width exceeds u32".into()))?;
    let h = u32::try_from(out.height())
        .map_err(|_| HarnessError::InvalidSpec("height exceeds u32".into()))?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| HarnessError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| HarnessError::Io(e.to_string()))
}

/// Path of frame `index` inside `dir`.
pub fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:04}.png"))
}

/// Renders an animation of `spec` into `dir` as `frame_0000.png`, ... .
///
/// Creates `dir` if needed. Returns the paths written, which stop short of
/// `frames` if `abort` fired.
pub fn write_frames(
    spec: &RenderSpec,
    frames: usize,
    offset_step: i64,
    threads: usize,
    abort: &(dyn AbortSignal + Sync),
    dir: &Path,
) -> Result<Vec<PathBuf>, HarnessError> {
    std::fs::create_dir_all(dir).map_err(|e| HarnessError::Io(e.to_string()))?;
    let mut written = Vec::with_capacity(frames);
    render_frames(spec, frames, offset_step, threads, abort, |index, out| {
        let path = frame_path(dir, index);
        write_png(out, &path)?;
        written.push(path);
        Ok(())
    })?;
    Ok(written)
}
