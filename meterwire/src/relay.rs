use std::{borrow::Cow, fmt, ops::Not};

/// Number of relays on the meter, numbered from 1.
pub const RELAY_COUNT: u8 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RelayState {
	On,
	#[default]
	Off,
}

impl RelayState {
	#[inline]
	pub fn is_on(self) -> bool {
		self == Self::On
	}
}

impl fmt::Display for RelayState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::On => f.write_str("ON"),
			Self::Off => f.write_str("OFF"),
		}
	}
}

#[derive(Debug)]
pub struct UnknownRelayStateLiteral<'a>(Cow<'a, str>);

impl<'a> fmt::Display for UnknownRelayStateLiteral<'a> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Self(literal) = self;
		write!(f, "Unknown literal for RelayState: {literal}")
	}
}

impl<'a> std::error::Error for UnknownRelayStateLiteral<'a> {}

fn from_literal(value: &str) -> Option<RelayState> {
	match value.to_ascii_lowercase().as_str() {
		"on" | "true" | "1" => Some(RelayState::On),
		"off" | "false" | "0" => Some(RelayState::Off),
		_ => None,
	}
}

impl<'a> TryFrom<&'a str> for RelayState {
	type Error = UnknownRelayStateLiteral<'a>;
	fn try_from(value: &'a str) -> Result<Self, Self::Error> {
		from_literal(value).ok_or(UnknownRelayStateLiteral(Cow::Borrowed(value)))
	}
}

impl TryFrom<String> for RelayState {
	type Error = UnknownRelayStateLiteral<'static>;
	fn try_from(value: String) -> Result<Self, Self::Error> {
		match from_literal(&value) {
			Some(state) => Ok(state),
			None => Err(UnknownRelayStateLiteral(Cow::Owned(value))),
		}
	}
}

impl From<bool> for RelayState {
	fn from(value: bool) -> Self {
		match value {
			true => Self::On,
			false => Self::Off,
		}
	}
}

impl From<RelayState> for bool {
	fn from(value: RelayState) -> Self {
		value.is_on()
	}
}

impl Not for RelayState {
	type Output = Self;

	fn not(self) -> Self::Output {
		match self {
			Self::On => Self::Off,
			Self::Off => Self::On,
		}
	}
}
