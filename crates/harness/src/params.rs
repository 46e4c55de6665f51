//! Helpers for reading typed field-source parameters from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name and a default. A missing key or
//! a value of the wrong type yields the default, so a partial params object
//! always produces a usable source.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts integers as well as floats.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts an `f32` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    param_f64(params, name, f64::from(default)) as f32
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Negative or fractional numbers count as the wrong type.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}
