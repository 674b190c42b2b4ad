use crate::{series::SeriesError, session::Session, status::ConnectionStatus, util::time_label};
use meterwire::{Snapshot, TimeRange};

/// Routes one live reading into the session.
///
/// Updates the displayed readings, the connection status and the reported
/// relay states, and appends the reading to every chart. While a history
/// fetch is outstanding the reading is held back instead of charted. The
/// caller redraws once afterwards.
pub fn ingest_snapshot(
	session: &mut Session,
	snapshot: &Snapshot,
	range: TimeRange,
) -> Result<(), SeriesError> {
	tracing::trace!("ingesting reading at {} ({range} view)", snapshot.timestamp);

	session.readings = Some(snapshot.into());
	session.actuators.sync(snapshot.relay_states());
	session.connection.record(ConnectionStatus::Online);

	if session.backfill_pending {
		tracing::debug!("history fetch outstanding, holding reading back");
		session.defer(snapshot.clone());
		return Ok(());
	}

	let label = time_label(snapshot.timestamp);
	session.series.append_snapshot(&label, snapshot)
}
