use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Window of history shown on the charts and summarised by the statistics.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
	Hour,
	#[default]
	Day,
	Week,
	Month,
}

/// The query parameter selecting how far back a history request reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryWindow {
	Hours(u32),
	Days(u32),
}

impl TimeRange {
	pub const ALL: [TimeRange; 4] = [Self::Hour, Self::Day, Self::Week, Self::Month];

	/// The value of the `period` query parameter for this range.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Hour => "hour",
			Self::Day => "day",
			Self::Week => "week",
			Self::Month => "month",
		}
	}

	pub fn history_window(&self) -> HistoryWindow {
		match self {
			Self::Hour => HistoryWindow::Hours(1),
			Self::Day => HistoryWindow::Hours(24),
			Self::Week => HistoryWindow::Days(7),
			Self::Month => HistoryWindow::Days(30),
		}
	}
}

impl HistoryWindow {
	/// Returns the query pair for a history request, e.g. `("hours", "24")`.
	pub fn query_pair(&self) -> (&'static str, String) {
		match self {
			Self::Hours(n) => ("hours", n.to_string()),
			Self::Days(n) => ("days", n.to_string()),
		}
	}
}

impl fmt::Display for TimeRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTimeRange(pub String);

impl fmt::Display for UnknownTimeRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Self(literal) = self;
		write!(f, "unknown time range '{literal}', expected hour, day, week or month")
	}
}

impl std::error::Error for UnknownTimeRange {}

impl FromStr for TimeRange {
	type Err = UnknownTimeRange;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|range| range.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownTimeRange(s.to_string()))
	}
}
