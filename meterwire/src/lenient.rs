//! Tolerant decoders for reading fields.
//!
//! The data service serialises database decimals as strings and leaves
//! unmeasured columns as `null`. A value that cannot be read as a finite
//! number decodes as absent rather than failing the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes a JSON number, numeric string, or null into `Option<f64>`.
///
/// Use with `#[serde(default, deserialize_with = "meterwire::lenient::number")]`.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
	let value = Value::deserialize(deserializer)?;
	Ok(number_from_value(&value))
}

/// Decodes a JSON boolean, 0/1, or a boolean-ish string. Anything else is
/// `false`.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
	let value = Value::deserialize(deserializer)?;
	Ok(match value {
		Value::Bool(value) => value,
		Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
		Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "on" | "1"),
		_ => false,
	})
}

fn number_from_value(value: &Value) -> Option<f64> {
	let number = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	number.filter(|n| n.is_finite())
}
