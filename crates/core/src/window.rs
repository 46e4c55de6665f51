//! Triangular weight window over integration steps.
//!
//! Step indices run from `-num_steps` (far end of the backward pass) through
//! `0` (the start pixel) to `+num_steps`. With the window enabled, a step's
//! weight falls off linearly with its cyclic distance from `offset`, reaching
//! zero at `width` steps. Sweeping `offset` frame by frame moves a focus band
//! along every streamline, which animates coherently.

/// Weight a windowed render needs to accumulate for a pixel to be valid.
pub const MIN_WINDOWED_WEIGHT: f32 = 0.5;

/// Distance-based step weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightWindow {
    /// When false every step weighs 1.0.
    pub enabled: bool,
    /// Half-width in steps; weight is zero at this distance and beyond.
    pub width: usize,
    /// Focal step index. May lie outside `[-num_steps, num_steps]`; it wraps.
    pub offset: i64,
}

impl Default for WeightWindow {
    fn default() -> Self {
        Self::disabled()
    }
}

impl WeightWindow {
    /// Default half-width.
    pub const DEFAULT_WIDTH: usize = 5;
    /// Smallest accepted half-width when enabled.
    pub const MIN_WIDTH: usize = 3;

    /// Constant weight 1.0 for every step.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            width: Self::DEFAULT_WIDTH,
            offset: 0,
        }
    }

    /// An enabled triangular window.
    pub fn triangular(width: usize, offset: i64) -> Self {
        Self {
            enabled: true,
            width,
            offset,
        }
    }

    /// Weight of the step at `index` on a streamline of `num_steps` per side.
    pub fn weight(&self, index: i64, num_steps: usize) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        let dist = cyclic_distance(index, self.offset, num_steps);
        (1.0 - dist as f32 / self.width as f32).max(0.0)
    }

    /// Whether an accumulated weight is enough to produce a visible pixel.
    pub fn is_valid(&self, weight_sum: f32, samples: usize) -> bool {
        if self.enabled {
            weight_sum >= MIN_WINDOWED_WEIGHT
        } else {
            samples >= 2
        }
    }
}

/// Distance between two step indices on the cycle of period `2 * num_steps`.
///
/// Of the two ways round the cycle the shorter one is taken, so `-num_steps`
/// and `+num_steps` coincide. With `num_steps == 0` the plain distance is used.
pub fn cyclic_distance(index: i64, offset: i64, num_steps: usize) -> u64 {
    let period = 2 * num_steps as i128;
    let diff = i128::from(index) - i128::from(offset);
    if period == 0 {
        return diff.unsigned_abs() as u64;
    }
    let d = diff.rem_euclid(period);
    d.min(period - d) as u64
}
