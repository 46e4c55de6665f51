#![deny(unsafe_code)]
//! Field registry, render pipeline and image export for the LIC core.
//!
//! The core knows nothing about where vector fields come from or where
//! pixels go. This crate supplies synthetic [`sources`], a name-based
//! registry ([`FieldKind`]), a reproducible [`RenderSpec`], the
//! [`pipeline`] that ties them to the kernel, and RGBA/PNG output. The CLI
//! depends on it so that dispatch logic lives in one place.

pub mod error;
pub mod params;
pub mod pipeline;
pub mod pixel;
#[cfg(feature = "png")]
pub mod snapshot;
pub mod sources;
pub mod spec;

pub use error::HarnessError;
pub use pipeline::{render_frames, render_spec};
pub use spec::{LicConfig, RenderSpec};

use glam::Vec2;
use lic_core::Xorshift64;
use serde_json::Value;

use params::{param_bool, param_f32, param_f64, param_usize};
use sources::{
    Attractor, Composite, CurlFlow, PerlinFlow, Punctured, Saddle, Uniform, VectorSource, Vortex,
};

/// All available field names.
const FIELD_NAMES: &[&str] = &[
    "uniform",
    "vortex",
    "attractor",
    "saddle",
    "perlin",
    "curl",
    "dipole",
    "vortices",
];

/// Seed offset that decorrelates field noise from LIC noise.
const FIELD_SEED_OFFSET: u32 = 7919;

/// Enumeration of the synthetic vector fields.
///
/// Use [`FieldKind::from_name`] for string-based construction.
pub enum FieldKind {
    Uniform(Uniform),
    Vortex(Vortex),
    Attractor(Attractor),
    Saddle(Saddle),
    Perlin(PerlinFlow),
    Curl(CurlFlow),
    /// Two counter-rotating vortices.
    Dipole(Composite),
    /// Randomly placed vortices of random spin.
    Vortices(Composite),
}

impl FieldKind {
    /// Constructs a field by name for a `width x height` canvas.
    ///
    /// Positions default to the canvas centre. Returns
    /// `HarnessError::UnknownField` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u32,
        params: &Value,
    ) -> Result<Self, HarnessError> {
        let center = center_param(params, width, height);
        let strength = param_f32(params, "strength", 1.0);
        let field_seed = seed.wrapping_add(FIELD_SEED_OFFSET);
        let kind = match name {
            "uniform" => {
                let angle = param_f32(params, "angle", 0.0).to_radians();
                FieldKind::Uniform(Uniform {
                    direction: Vec2::from_angle(angle) * strength,
                })
            }
            "vortex" => {
                let sign = if param_bool(params, "clockwise", false) {
                    -1.0
                } else {
                    1.0
                };
                FieldKind::Vortex(Vortex {
                    center,
                    strength: strength * sign,
                })
            }
            "attractor" => FieldKind::Attractor(Attractor { center, strength }),
            "saddle" => FieldKind::Saddle(Saddle { center }),
            "perlin" => FieldKind::Perlin(PerlinFlow::new(
                param_f64(params, "scale", 0.02),
                strength,
                field_seed,
            )),
            "curl" => FieldKind::Curl(CurlFlow::new(
                param_f64(params, "scale", 0.02),
                strength,
                field_seed,
            )),
            "dipole" => {
                let half = 0.5 * param_f32(params, "separation", width as f32 / 3.0);
                let offset = Vec2::new(half, 0.0);
                FieldKind::Dipole(
                    Composite::new()
                        .add(Box::new(Vortex {
                            center: center - offset,
                            strength,
                        }))
                        .add(Box::new(Vortex {
                            center: center + offset,
                            strength: -strength,
                        })),
                )
            }
            "vortices" => {
                let count = param_usize(params, "count", 4);
                let mut rng = Xorshift64::new(u64::from(field_seed));
                let size = Vec2::new(width as f32, height as f32);
                let composite = (0..count).fold(Composite::new(), |acc, _| {
                    let center = Vec2::new(rng.next_f32(), rng.next_f32()) * size;
                    let spin = if rng.next_f32() < 0.5 { -1.0 } else { 1.0 };
                    acc.add(Box::new(Vortex {
                        center,
                        strength: strength * spin,
                    }))
                });
                FieldKind::Vortices(composite)
            }
            _ => return Err(HarnessError::UnknownField(name.to_string())),
        };
        Ok(kind)
    }

    /// Returns a slice of all recognized field names.
    pub fn list_fields() -> &'static [&'static str] {
        FIELD_NAMES
    }
}

impl VectorSource for FieldKind {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        match self {
            FieldKind::Uniform(s) => s.sample(x, y),
            FieldKind::Vortex(s) => s.sample(x, y),
            FieldKind::Attractor(s) => s.sample(x, y),
            FieldKind::Saddle(s) => s.sample(x, y),
            FieldKind::Perlin(s) => s.sample(x, y),
            FieldKind::Curl(s) => s.sample(x, y),
            FieldKind::Dipole(s) => s.sample(x, y),
            FieldKind::Vortices(s) => s.sample(x, y),
        }
    }
}

/// `(cx, cy)` from params, defaulting to the canvas centre.
fn center_param(params: &Value, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        param_f32(params, "cx", width as f32 / 2.0),
        param_f32(params, "cy", height as f32 / 2.0),
    )
}

/// Builds a named field, punched with a NaN hole when `hole_radius > 0`.
///
/// The hole is centred on `(hole_cx, hole_cy)`, defaulting to the canvas centre.
pub fn build_field(
    name: &str,
    width: usize,
    height: usize,
    seed: u32,
    params: &Value,
) -> Result<Box<dyn VectorSource>, HarnessError> {
    let kind = FieldKind::from_name(name, width, height, seed, params)?;
    let radius = param_f32(params, "hole_radius", 0.0);
    if radius > 0.0 {
        let center = Vec2::new(
            param_f32(params, "hole_cx", width as f32 / 2.0),
            param_f32(params, "hole_cy", height as f32 / 2.0),
        );
        return Ok(Box::new(Punctured::new(Box::new(kind), center, radius)));
    }
    Ok(Box::new(kind))
}
