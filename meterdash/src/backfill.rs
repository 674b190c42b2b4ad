//! Wholesale replacement of the charts from a history query.

use crate::{
	series::SeriesError,
	session::Session,
	util::{datetime_label, time_label},
};
use meterapi::{ApiError, DataService};
use meterwire::{Snapshot, TimeRange};
use time::PrimitiveDateTime;

/// Fetches the readings covering `range`, oldest first.
pub async fn fetch_history<S>(service: &S, range: TimeRange) -> Result<Vec<Snapshot>, ApiError>
where
	S: DataService + ?Sized,
{
	let window = range.history_window();
	tracing::debug!("fetching {range} history ({window:?})");
	service.history(window).await
}

/// Replaces every chart with `rows`, in the order the service returned them.
///
/// The number of points is whatever the service returned; the live capacity
/// only applies to later appends. Returns the number of points installed.
pub fn apply_history(session: &mut Session, rows: &[Snapshot]) -> Result<usize, SeriesError> {
	let labelled: Vec<(String, Snapshot)> = rows
		.iter()
		.map(|row| (datetime_label(row.timestamp), row.clone()))
		.collect();

	session.series.replace_all(&labelled)?;
	tracing::info!(
		"loaded {} historical readings for the {} view",
		labelled.len(),
		session.range
	);
	Ok(labelled.len())
}

/// Charts the live readings held back while the history was loading, in
/// arrival order. Readings at or before `after`, the last history row, are
/// already covered and dropped. Returns the number of points appended.
pub fn chart_deferred(
	session: &mut Session,
	after: Option<PrimitiveDateTime>,
) -> Result<usize, SeriesError> {
	let mut charted = 0;
	while let Some(snapshot) = session.deferred.pop_front() {
		if after.map_or(false, |last| snapshot.timestamp <= last) {
			continue;
		}
		session
			.series
			.append_snapshot(&time_label(snapshot.timestamp), &snapshot)?;
		charted += 1;
	}
	if charted > 0 {
		tracing::debug!("charted {charted} readings received during the history fetch");
	}
	Ok(charted)
}
