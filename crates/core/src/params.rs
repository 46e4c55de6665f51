//! Render parameters and their entry-time validation.

use crate::error::LicError;
use crate::noise::{NoiseField, NoiseKind};
use crate::sampler::Interpolation;
use crate::window::WeightWindow;

/// Default noise frequency.
pub const DEFAULT_FREQUENCY: f32 = 1.0;
/// Default integration steps per direction.
pub const DEFAULT_NUM_STEPS: usize = 15;

/// Everything a render needs besides the vector field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LicParams {
    /// Noise coordinate scale; recommended range 0 to 2.
    pub frequency: f32,
    /// Integration steps per direction; recommended range 1 to 50.
    pub num_steps: usize,
    /// Step weighting.
    pub window: WeightWindow,
    /// Vector field sampling policy.
    pub interpolation: Interpolation,
    /// Noise realisation.
    pub noise: NoiseKind,
    /// Noise seed.
    pub seed: u32,
}

impl Default for LicParams {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            num_steps: DEFAULT_NUM_STEPS,
            window: WeightWindow::disabled(),
            interpolation: Interpolation::Nearest,
            noise: NoiseKind::Coherent,
            seed: 0,
        }
    }
}

impl LicParams {
    /// Rejects parameter sets the kernel must not run with.
    pub fn validate(&self) -> Result<(), LicError> {
        if !self.frequency.is_finite() {
            return Err(LicError::InvalidParameter {
                name: "frequency",
                reason: format!("must be finite, got {}", self.frequency),
            });
        }
        if self.num_steps == 0 {
            return Err(LicError::InvalidParameter {
                name: "num_steps",
                reason: "must be at least 1".into(),
            });
        }
        if self.window.enabled && self.window.width < WeightWindow::MIN_WIDTH {
            return Err(LicError::InvalidParameter {
                name: "weight_window_width",
                reason: format!(
                    "must be at least {}, got {}",
                    WeightWindow::MIN_WIDTH,
                    self.window.width
                ),
            });
        }
        Ok(())
    }

    /// Builds the noise field selected by `noise`, `frequency` and `seed`.
    pub fn build_noise(&self) -> Result<Box<dyn NoiseField>, LicError> {
        self.noise.build(self.frequency, self.seed)
    }
}
