//! Noise fields: the texture smeared along streamlines.
//!
//! A [`NoiseField`] maps continuous coordinates to a value in [0, 1]. Two
//! realisations are provided: [`CoherentNoise`] (Simplex noise, continuous, no
//! tiling) and [`TileNoise`] (a small random tile repeated with integer
//! wraparound). Both return NaN for non-finite input so the kernel can treat
//! the sample as failed.

use noise::{NoiseFn, Simplex};

use crate::error::LicError;
use crate::prng::Xorshift64;

/// A deterministic scalar texture sampled by the LIC kernel.
pub trait NoiseField: Send + Sync {
    /// Sample at `(x, y)`. Finite input yields a value in [0, 1]; non-finite
    /// input yields NaN.
    fn sample(&self, x: f32, y: f32) -> f32;
}

fn check_frequency(frequency: f32) -> Result<(), LicError> {
    if frequency.is_finite() {
        Ok(())
    } else {
        Err(LicError::InvalidParameter {
            name: "frequency",
            reason: format!("must be finite, got {frequency}"),
        })
    }
}

/// Simplex noise evaluated at `frequency * (x, y)` and remapped to [0, 1].
pub struct CoherentNoise {
    noise: Simplex,
    frequency: f64,
}

impl CoherentNoise {
    /// Creates a coherent noise field. Small frequencies give large blobs.
    pub fn new(frequency: f32, seed: u32) -> Result<Self, LicError> {
        check_frequency(frequency)?;
        Ok(Self {
            noise: Simplex::new(seed),
            frequency: f64::from(frequency),
        })
    }
}

impl NoiseField for CoherentNoise {
    fn sample(&self, x: f32, y: f32) -> f32 {
        if !x.is_finite() || !y.is_finite() {
            return f32::NAN;
        }
        let n = self
            .noise
            .get([self.frequency * f64::from(x), self.frequency * f64::from(y)]);
        (0.5 + 0.5 * n).clamp(0.0, 1.0) as f32
    }
}

/// A `size x size` tile of uniform random values, repeated across the plane.
#[derive(Debug, Clone)]
pub struct TileNoise {
    tile: Vec<f32>,
    size: usize,
    frequency: f32,
}

impl TileNoise {
    /// Default tile edge length.
    pub const DEFAULT_SIZE: usize = 64;

    /// Creates a tile of [`Self::DEFAULT_SIZE`] cells per side.
    pub fn new(frequency: f32, seed: u32) -> Result<Self, LicError> {
        Self::with_size(frequency, seed, Self::DEFAULT_SIZE)
    }

    /// Creates a tile of `size x size` cells filled from `Xorshift64(seed)`.
    pub fn with_size(frequency: f32, seed: u32, size: usize) -> Result<Self, LicError> {
        check_frequency(frequency)?;
        if size == 0 {
            return Err(LicError::InvalidDimensions);
        }
        let len = size.checked_mul(size).ok_or(LicError::InvalidDimensions)?;
        let mut rng = Xorshift64::new(u64::from(seed));
        let tile = (0..len).map(|_| rng.next_f32()).collect();
        Ok(Self {
            tile,
            size,
            frequency,
        })
    }

    /// Tile edge length in cells.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl NoiseField for TileNoise {
    fn sample(&self, x: f32, y: f32) -> f32 {
        let sx = self.frequency * x;
        let sy = self.frequency * y;
        if !sx.is_finite() || !sy.is_finite() {
            return f32::NAN;
        }
        let n = self.size as i64;
        let ix = (sx.floor() as i64).rem_euclid(n) as usize;
        let iy = (sy.floor() as i64).rem_euclid(n) as usize;
        self.tile[iy * self.size + ix]
    }
}

/// Which [`NoiseField`] realisation a render uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoiseKind {
    /// [`CoherentNoise`].
    #[default]
    Coherent,
    /// [`TileNoise`] with the default tile size.
    Tile,
}

impl NoiseKind {
    /// All kinds, for listings.
    pub const ALL: [NoiseKind; 2] = [NoiseKind::Coherent, NoiseKind::Tile];

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            NoiseKind::Coherent => "coherent",
            NoiseKind::Tile => "tile",
        }
    }

    /// Parses a name produced by [`NoiseKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Builds the noise field for one render.
    pub fn build(self, frequency: f32, seed: u32) -> Result<Box<dyn NoiseField>, LicError> {
        Ok(match self {
            NoiseKind::Coherent => Box::new(CoherentNoise::new(frequency, seed)?),
            NoiseKind::Tile => Box::new(TileNoise::new(frequency, seed)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coherent_noise_is_deterministic() {
        let a = CoherentNoise::new(0.3, 9).unwrap();
        let b = CoherentNoise::new(0.3, 9).unwrap();
        for i in 0..50 {
            let (x, y) = (i as f32 * 1.7, i as f32 * -0.9);
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn coherent_noise_is_continuous_across_integer_boundaries() {
        let noise = CoherentNoise::new(0.5, 1).unwrap();
        for i in 0..20 {
            let x = i as f32;
            let left = noise.sample(x - 1e-3, 3.0);
            let right = noise.sample(x + 1e-3, 3.0);
            assert!(
                (left - right).abs() < 0.01,
                "jump of {} at x = {x}",
                (left - right).abs()
            );
        }
    }

    #[test]
    fn coherent_noise_with_zero_frequency_is_constant() {
        let noise = CoherentNoise::new(0.0, 4).unwrap();
        let first = noise.sample(0.0, 0.0);
        assert_eq!(noise.sample(123.0, 55.5), first);
    }

    #[test]
    fn non_finite_input_yields_nan() {
        let coherent = CoherentNoise::new(1.0, 0).unwrap();
        let tile = TileNoise::new(1.0, 0).unwrap();
        for noise in [&coherent as &dyn NoiseField, &tile] {
            assert!(noise.sample(f32::NAN, 0.0).is_nan());
            assert!(noise.sample(0.0, f32::INFINITY).is_nan());
        }
    }

    #[test]
    fn non_finite_frequency_is_rejected() {
        assert!(CoherentNoise::new(f32::NAN, 0).is_err());
        assert!(TileNoise::new(f32::INFINITY, 0).is_err());
        assert!(NoiseKind::Tile.build(f32::NEG_INFINITY, 0).is_err());
    }

    #[test]
    fn tile_wraps_with_integer_period() {
        let tile = TileNoise::with_size(1.0, 3, 8).unwrap();
        assert_eq!(tile.sample(2.0, 5.0), tile.sample(10.0, 13.0));
        assert_eq!(tile.sample(2.0, 5.0), tile.sample(-6.0, -3.0));
        assert_eq!(tile.sample(2.2, 5.9), tile.sample(2.0, 5.0));
    }

    #[test]
    fn tile_frequency_scales_coordinates() {
        let tile = TileNoise::with_size(0.5, 3, 8).unwrap();
        assert_eq!(tile.sample(4.0, 0.0), tile.sample(5.0, 0.0));
    }

    #[test]
    fn tile_rejects_zero_size() {
        assert!(TileNoise::with_size(1.0, 0, 0).is_err());
    }

    #[test]
    fn noise_kind_names_round_trip() {
        for kind in NoiseKind::ALL {
            assert_eq!(NoiseKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NoiseKind::from_name("pink"), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn samples_stay_in_unit_interval(
                x in -1e4_f32..1e4,
                y in -1e4_f32..1e4,
                frequency in 0.0_f32..2.0,
                seed: u32,
            ) {
                let coherent = CoherentNoise::new(frequency, seed).unwrap();
                let tile = TileNoise::new(frequency, seed).unwrap();
                let c = coherent.sample(x, y);
                let t = tile.sample(x, y);
                prop_assert!((0.0..=1.0).contains(&c), "coherent sample {c}");
                prop_assert!((0.0..=1.0).contains(&t), "tile sample {t}");
            }
        }
    }
}
