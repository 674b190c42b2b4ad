use crate::{RelayState, RELAY_COUNT};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// A single reading from the meter, as returned by the data service.
///
/// Every measured quantity is optional. The service leaves columns the meter
/// did not report as `null`, and older rows predate the energy and cost
/// columns entirely.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Snapshot {
	/// Local clock time of the reading.
	#[serde(with = "crate::datetime")]
	pub timestamp: PrimitiveDateTime,

	/// Line voltage in Volts.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub voltage: Option<f64>,

	/// Per-line current in Amps.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub current1: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub current2: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub current3: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub total_current: Option<f64>,

	/// Per-line power in Watts.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub power1: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub power2: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub total_power: Option<f64>,

	/// Accumulated energy in kiloWatt hours.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub energy_l1: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub energy_l2: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub total_energy: Option<f64>,

	/// Accumulated cost in the configured currency.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub cost_l1: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub cost_l2: Option<f64>,
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub total_cost: Option<f64>,

	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub relay1_state: bool,
	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub relay2_state: bool,
	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub relay3_state: bool,

	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub theft_detected: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub theft_status: Option<TheftStatus>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TheftStatus {
	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub detected: bool,
	#[serde(default)]
	pub timestamp: Option<String>,
}

impl Snapshot {
	/// Creates a reading at `timestamp` with nothing measured.
	pub fn at(timestamp: PrimitiveDateTime) -> Self {
		Self {
			timestamp,
			voltage: None,
			current1: None,
			current2: None,
			current3: None,
			total_current: None,
			power1: None,
			power2: None,
			total_power: None,
			energy_l1: None,
			energy_l2: None,
			total_energy: None,
			cost_l1: None,
			cost_l2: None,
			total_cost: None,
			relay1_state: false,
			relay2_state: false,
			relay3_state: false,
			theft_detected: false,
			theft_status: None,
		}
	}

	/// Whether the meter reports a theft, either through the flat flag or the
	/// nested theft status.
	pub fn is_theft_detected(&self) -> bool {
		self.theft_detected
			|| self
				.theft_status
				.as_ref()
				.map_or(false, |status| status.detected)
	}

	/// Returns the reported state of every relay, indexed from 0.
	pub fn relay_states(&self) -> [RelayState; RELAY_COUNT as usize] {
		[
			self.relay1_state.into(),
			self.relay2_state.into(),
			self.relay3_state.into(),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::Snapshot;
	use crate::RelayState;
	use time::macros::datetime;

	const LATEST: &str = r#"{
		"id": 4711,
		"timestamp": "2024-05-01T12:30:05",
		"voltage": 231.42,
		"current1": 1.204,
		"current2": "0.513",
		"current3": null,
		"total_current": 1.717,
		"power1": 250.1,
		"power2": 110.0,
		"total_power": 360.1,
		"energy_l1": "1.250",
		"total_energy": 2.0,
		"relay1_state": true,
		"relay2_state": false,
		"relay3_state": true,
		"theft_status": { "detected": true, "timestamp": "2024-05-01T12:29:00" }
	}"#;

	#[test]
	fn decodes_latest_reading() {
		let snapshot: Snapshot = serde_json::from_str(LATEST).unwrap();
		assert_eq!(snapshot.timestamp, datetime!(2024-05-01 12:30:05));
		assert_eq!(snapshot.voltage, Some(231.42));
		assert_eq!(snapshot.current2, Some(0.513));
		assert_eq!(snapshot.current3, None);
		assert_eq!(snapshot.energy_l1, Some(1.25));
		assert_eq!(snapshot.energy_l2, None);
		assert_eq!(snapshot.cost_l1, None);
		assert_eq!(
			snapshot.relay_states(),
			[RelayState::On, RelayState::Off, RelayState::On]
		);
	}

	#[test]
	fn theft_from_nested_status() {
		let snapshot: Snapshot = serde_json::from_str(LATEST).unwrap();
		assert!(!snapshot.theft_detected);
		assert!(snapshot.is_theft_detected());
	}

	#[test]
	fn theft_from_flat_flag() {
		let mut snapshot = Snapshot::at(datetime!(2024-05-01 00:00));
		assert!(!snapshot.is_theft_detected());
		snapshot.theft_detected = true;
		assert!(snapshot.is_theft_detected());
	}

	#[test]
	fn history_rows_without_relays() {
		let rows: Vec<Snapshot> = serde_json::from_str(
			r#"[
				{"timestamp": "2024-05-01T10:00:00", "total_power": 10},
				{"timestamp": "2024-05-01T11:00:00.500000", "total_power": 20}
			]"#,
		)
		.unwrap();
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[1].total_power, Some(20.0));
		assert_eq!(rows[1].relay_states(), [RelayState::Off; 3]);
	}

	#[test]
	fn missing_timestamp_is_an_error() {
		assert!(serde_json::from_str::<Snapshot>(r#"{"voltage": 230}"#).is_err());
	}
}
