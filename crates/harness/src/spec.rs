//! Reproducible description of one LIC render.
//!
//! A [`RenderSpec`] captures everything needed to recreate an image: field
//! name and parameters, canvas size, LIC settings and seed. Two identical
//! specs rendered by the same binary produce bit-identical output.

use crate::error::HarnessError;
use lic_core::{Interpolation, LicParams, NoiseKind, WeightWindow};
use serde::{Deserialize, Serialize};

/// LIC settings in their serialised form.
///
/// Missing keys take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LicConfig {
    pub frequency: f32,
    pub num_steps: usize,
    pub use_weight_window: bool,
    pub weight_window_width: usize,
    pub weight_window_offset: i64,
    /// `"coherent"` or `"tile"`.
    pub noise: String,
    pub bilinear: bool,
}

impl Default for LicConfig {
    fn default() -> Self {
        let p = LicParams::default();
        Self {
            frequency: p.frequency,
            num_steps: p.num_steps,
            use_weight_window: p.window.enabled,
            weight_window_width: p.window.width,
            weight_window_offset: p.window.offset,
            noise: p.noise.name().to_string(),
            bilinear: p.interpolation == Interpolation::Bilinear,
        }
    }
}

impl LicConfig {
    /// Converts to core parameters, seeding the noise with `seed`.
    ///
    /// Fails on an unknown noise name or a parameter set the core rejects.
    pub fn to_params(&self, seed: u32) -> Result<LicParams, HarnessError> {
        let noise = NoiseKind::from_name(&self.noise)
            .ok_or_else(|| HarnessError::UnknownNoise(self.noise.clone()))?;
        let params = LicParams {
            frequency: self.frequency,
            num_steps: self.num_steps,
            window: WeightWindow {
                enabled: self.use_weight_window,
                width: self.weight_window_width,
                offset: self.weight_window_offset,
            },
            interpolation: if self.bilinear {
                Interpolation::Bilinear
            } else {
                Interpolation::Nearest
            },
            noise,
            seed,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Reproducible specification for one rendered image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderSpec {
    pub field: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_object")]
    pub field_params: serde_json::Value,
    #[serde(default)]
    pub lic: LicConfig,
    #[serde(default)]
    pub seed: u32,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl RenderSpec {
    /// Creates a spec with empty field params and default LIC settings.
    pub fn new(field: &str, width: usize, height: usize, seed: u32) -> Self {
        Self {
            field: field.to_string(),
            width,
            height,
            field_params: empty_object(),
            lic: LicConfig::default(),
            seed,
        }
    }

    /// Checks the canvas size and the LIC settings.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.width == 0 || self.height == 0 {
            return Err(HarnessError::InvalidSpec(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        self.width.checked_mul(self.height).ok_or_else(|| {
            HarnessError::InvalidSpec(format!("{}x{} overflows", self.width, self.height))
        })?;
        if !self.field_params.is_object() {
            return Err(HarnessError::InvalidSpec(
                "field_params must be a JSON object".into(),
            ));
        }
        self.lic.to_params(self.seed)?;
        Ok(())
    }

    /// Core parameters for this spec.
    pub fn lic_params(&self) -> Result<LicParams, HarnessError> {
        self.lic.to_params(self.seed)
    }

    /// Parses a spec from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HarnessError> {
        serde_json::from_str(text).map_err(|e| HarnessError::InvalidSpec(e.to_string()))
    }
}
