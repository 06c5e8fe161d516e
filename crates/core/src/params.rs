//! Lenient extraction of effect and site settings from a JSON object.
//!
//! A missing key or a value of the wrong JSON type falls back to the default,
//! so a partially filled settings object is always usable.

use serde_json::Value;

/// Reads a number, accepting integers as well as floats.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Reads a finite, strictly positive number. Zero, negative, and non-finite
/// values fall back to `default`.
pub fn param_positive(params: &Value, name: &str, default: f64) -> f64 {
    let v = param_f64(params, name, default);
    if v.is_finite() && v > 0.0 {
        v
    } else {
        default
    }
}
