use serde::{Deserialize, Serialize};

/// Relay states and the stored energy price, as held by the data service.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RelaySettings {
	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub relay1: bool,
	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub relay2: bool,
	#[serde(default, deserialize_with = "crate::lenient::flag")]
	pub relay3: bool,
	/// Price per kiloWatt hour.
	#[serde(default, deserialize_with = "crate::lenient::number")]
	pub price: Option<f64>,
	#[serde(default)]
	pub timestamp: Option<String>,
}

impl RelaySettings {
	pub fn relays(&self) -> [bool; crate::RELAY_COUNT as usize] {
		[self.relay1, self.relay2, self.relay3]
	}
}

/// Body of a relay control request.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct RelayCommand {
	pub relay: u8,
	pub state: bool,
}

/// Body of a price update request.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct PriceCommand {
	pub price: f64,
}

/// The data service's reply to a command.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Acknowledgement {
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::{RelayCommand, RelaySettings};

	// {"relay1":true,"relay2":false,"relay3":true,"price":"5.00","timestamp":null}
	#[test]
	fn decodes_relay_settings() {
		let settings: RelaySettings = serde_json::from_str(
			r#"{"relay1":true,"relay2":false,"relay3":true,"price":"5.00","timestamp":null}"#,
		)
		.unwrap();
		assert_eq!(settings.relays(), [true, false, true]);
		assert_eq!(settings.price, Some(5.0));
	}

	#[test]
	fn encodes_relay_command() {
		let body = serde_json::to_string(&RelayCommand {
			relay: 3,
			state: true,
		})
		.unwrap();
		assert_eq!(body, r#"{"relay":3,"state":true}"#);
	}
}
