mod relay;
pub use relay::{RelayState, UnknownRelayStateLiteral, RELAY_COUNT};

// Telemetry readings published by the meter.
//
pub mod snapshot;
pub use snapshot::{Snapshot, TheftStatus};

// Aggregates over a time range.
//
pub mod stats;
pub use stats::StatisticsSummary;

mod range;
pub use range::{HistoryWindow, TimeRange, UnknownTimeRange};

mod settings;
pub use settings::{Acknowledgement, PriceCommand, RelayCommand, RelaySettings};

pub mod lenient;

use time::{format_description::FormatItem, PrimitiveDateTime};

/// Date-string format used by the data service for reading timestamps.
pub const DATETIME_FORMAT: &[FormatItem<'_>] =
	time::macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Same as [`DATETIME_FORMAT`], with the fractional seconds the service emits
/// when the stored timestamp has a sub-second part.
pub const DATETIME_FRACTIONAL_FORMAT: &[FormatItem<'_>] = time::macros::format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"
);

/// Parses a timestamp in either of the formats the data service produces.
pub fn parse_datetime(value: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
	PrimitiveDateTime::parse(value, DATETIME_FORMAT)
		.or_else(|_| PrimitiveDateTime::parse(value, DATETIME_FRACTIONAL_FORMAT))
}

// Serde adapter for PrimitiveDateTime's in the data service's format.
//
// #[derive(Debug, Deserialize, Serialize)]
// struct Example {
// 	 #[serde(with = "meterwire::datetime")]
//	 time: PrimitiveDateTime,
// }
//
pub mod datetime {
	use serde::{de, ser, Deserialize, Deserializer, Serializer};
	use time::PrimitiveDateTime;

	pub fn serialize<S: Serializer>(
		value: &PrimitiveDateTime,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		let format = if value.nanosecond() == 0 {
			super::DATETIME_FORMAT
		} else {
			super::DATETIME_FRACTIONAL_FORMAT
		};
		let formatted = value.format(format).map_err(ser::Error::custom)?;
		serializer.serialize_str(&formatted)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<PrimitiveDateTime, D::Error> {
		let value = String::deserialize(deserializer)?;
		super::parse_datetime(&value).map_err(de::Error::custom)
	}
}
