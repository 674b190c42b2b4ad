use serde::{Deserialize, Serialize};

/// Aggregates over the readings of one time range.
///
/// Every field is `null` when the range holds no readings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct StatisticsSummary {
	#[serde(default)]
	pub total_readings: Option<u64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub avg_voltage: Option<f64>,
	/// Mean of the total current in Amps.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub avg_current: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub avg_power: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub max_power: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub min_power: Option<f64>,
	/// Highest accumulated energy reading in the range, in kiloWatt hours.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub total_energy_kwh: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub total_cost: Option<f64>,
}
