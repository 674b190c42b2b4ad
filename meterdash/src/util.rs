use time::{format_description::FormatItem, PrimitiveDateTime};

const TIME_LABEL: &[FormatItem<'_>] = time::macros::format_description!("[hour]:[minute]:[second]");

const DATETIME_LABEL: &[FormatItem<'_>] =
	time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Chart label for a live reading: the time of day.
pub fn time_label(timestamp: PrimitiveDateTime) -> String {
	timestamp
		.format(TIME_LABEL)
		.unwrap_or_else(|_| timestamp.time().to_string())
}

/// Chart label for a historical reading, which may be days old.
pub fn datetime_label(timestamp: PrimitiveDateTime) -> String {
	timestamp
		.format(DATETIME_LABEL)
		.unwrap_or_else(|_| timestamp.to_string())
}
