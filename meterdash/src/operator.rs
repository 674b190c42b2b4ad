//! Operator intents and their text form.

use meterwire::{RelayState, TimeRange};
use std::str::FromStr;
use thiserror::Error;

/// Something the operator asked for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
	ToggleRelay { relay: u8, state: RelayState },
	SetPrice(f64),
	ChangeRange(TimeRange),
	/// Switch the main relay back on after a theft alert.
	ResetTheft,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperatorParseError {
	#[error("empty command")]
	Empty,
	#[error("unknown command '{0}', expected relay, price, range or reset-theft")]
	UnknownCommand(String),
	#[error("usage: {0}")]
	Usage(&'static str),
	#[error("{0}")]
	Invalid(String),
}

impl FromStr for Intent {
	type Err = OperatorParseError;

	/// Parses `relay <n> <on|off>`, `price <value>`, `range <range>` or
	/// `reset-theft`.
	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let mut words = line.split_whitespace();
		let command = words.next().ok_or(OperatorParseError::Empty)?;
		let arguments: Vec<&str> = words.collect();

		match (command.to_ascii_lowercase().as_str(), arguments.as_slice()) {
			("relay", [relay, state]) => {
				let relay = relay
					.parse()
					.map_err(|_| OperatorParseError::Invalid(format!("bad relay number '{relay}'")))?;
				let state = RelayState::try_from(*state)
					.map_err(|error| OperatorParseError::Invalid(error.to_string()))?;
				Ok(Self::ToggleRelay { relay, state })
			}
			("relay", _) => Err(OperatorParseError::Usage("relay <1-3> <on|off>")),
			// Unparseable prices are passed on as NaN so validation rejects them
			// with the usual feedback.
			("price", [price]) => Ok(Self::SetPrice(price.parse().unwrap_or(f64::NAN))),
			("price", _) => Err(OperatorParseError::Usage("price <value>")),
			("range", [range]) => range
				.parse()
				.map(Self::ChangeRange)
				.map_err(|error: meterwire::UnknownTimeRange| {
					OperatorParseError::Invalid(error.to_string())
				}),
			("range", _) => Err(OperatorParseError::Usage("range <hour|day|week|month>")),
			("reset-theft", []) => Ok(Self::ResetTheft),
			("reset-theft", _) => Err(OperatorParseError::Usage("reset-theft")),
			(other, _) => Err(OperatorParseError::UnknownCommand(other.to_string())),
		}
	}
}
