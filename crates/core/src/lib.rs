#![deny(unsafe_code)]
//! Line Integral Convolution (LIC) core.
//!
//! Given two same-sized scalar grids holding the X and Y components of a 2D
//! vector field, the kernel traces a short streamline through every pixel,
//! forward and backward, and averages a noise texture along it. The result is
//! one grey value plus one alpha per pixel, with streaks that follow the flow.
//!
//! Provides [`Grid`]/[`GridView`]/[`VectorField`] inputs, the edge-clamped
//! [`sampler`], [`NoiseField`] implementations, the [`WeightWindow`] used for
//! animated renders, the per-pixel [`kernel`], and a row driver
//! ([`Lic::render`], [`Lic::render_band`]) that polls an [`AbortSignal`].

pub mod error;
pub mod grid;
pub mod kernel;
pub mod noise;
pub mod output;
pub mod params;
pub mod prng;
pub mod render;
pub mod sampler;
pub mod window;

pub use error::LicError;
pub use grid::{Grid, GridView, VectorField};
pub use kernel::{lic_pixel, Lic};
pub use noise::{CoherentNoise, NoiseField, NoiseKind, TileNoise};
pub use output::{OutputBand, OutputBuffer, OutputPixel, Region};
pub use params::LicParams;
pub use prng::Xorshift64;
pub use render::{AbortSignal, NeverAbort, RenderOutcome};
pub use sampler::Interpolation;
pub use window::WeightWindow;
