use crate::{
	commands::ActuatorBoard,
	readings::{CurrentReadings, StatisticsDisplay},
	series::{SeriesSet, DEFAULT_CAPACITY},
	status::{ConnectionStatus, ConnectionStatusTracker},
};
use meterwire::{Snapshot, TimeRange};
use std::collections::VecDeque;

/// All dashboard state for one session.
///
/// Created when the dashboard starts, owned by the scheduler while it runs,
/// and handed back when the scheduler stops.
#[derive(Debug)]
pub struct Session {
	pub(crate) range: TimeRange,
	pub(crate) series: SeriesSet,
	pub(crate) readings: Option<CurrentReadings>,
	pub(crate) statistics: StatisticsDisplay,
	pub(crate) connection: ConnectionStatusTracker,
	pub(crate) actuators: ActuatorBoard,
	pub(crate) stored_price: Option<f64>,
	/// Set while a history fetch is outstanding. Live readings are held in
	/// `deferred` meanwhile, the history will replace the charts wholesale.
	pub(crate) backfill_pending: bool,
	pub(crate) deferred: VecDeque<Snapshot>,
}

impl Session {
	pub fn new(range: TimeRange, capacity: usize) -> Self {
		Self {
			range,
			series: SeriesSet::new(capacity),
			readings: None,
			statistics: StatisticsDisplay::default(),
			connection: ConnectionStatusTracker::default(),
			actuators: ActuatorBoard::default(),
			stored_price: None,
			backfill_pending: false,
			deferred: VecDeque::new(),
		}
	}

	pub fn range(&self) -> TimeRange {
		self.range
	}

	pub fn series(&self) -> &SeriesSet {
		&self.series
	}

	/// The latest reading, once one has been received.
	pub fn readings(&self) -> Option<&CurrentReadings> {
		self.readings.as_ref()
	}

	pub fn statistics(&self) -> &StatisticsDisplay {
		&self.statistics
	}

	pub fn connection(&self) -> ConnectionStatus {
		self.connection.status()
	}

	pub fn actuators(&self) -> &ActuatorBoard {
		&self.actuators
	}

	/// Price per kiloWatt hour as last read from the data service.
	pub fn stored_price(&self) -> Option<f64> {
		self.stored_price
	}

	pub fn is_backfill_pending(&self) -> bool {
		self.backfill_pending
	}

	/// Live readings waiting for the outstanding history fetch.
	pub fn deferred(&self) -> &VecDeque<Snapshot> {
		&self.deferred
	}

	/// Holds back a live reading until the history fetch settles. At most a
	/// chart's worth is kept.
	pub(crate) fn defer(&mut self, snapshot: Snapshot) {
		self.deferred.push_back(snapshot);
		if self.deferred.len() > self.series.capacity() {
			self.deferred.pop_front();
		}
	}

	pub(crate) fn set_range(&mut self, range: TimeRange) {
		if self.range != range {
			tracing::info!("time range changed from {} to {range}", self.range);
		}
		self.range = range;
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new(TimeRange::default(), DEFAULT_CAPACITY)
	}
}
