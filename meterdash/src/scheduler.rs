//! Drives the dashboard: periodic polls, history loads and operator
//! commands.
//!
//! The scheduler task owns the [`Session`] and is the only code that mutates
//! it. Every network call runs in its own spawned task and reports back over
//! a channel, so a slow fetch never holds up the timers or the operator.

use crate::{
	backfill::{apply_history, chart_deferred, fetch_history},
	commands::{validate_price, PendingToggle},
	ingest::ingest_snapshot,
	operator::Intent,
	render::{Notice, Redraw, Render},
	session::Session,
	status::ConnectionStatus,
};
use meterapi::{ApiError, DataService};
use meterwire::{
	Acknowledgement, RelaySettings, RelayState, Snapshot, StatisticsSummary, TimeRange,
};
use std::{sync::Arc, time::Duration};
use tokio::{
	sync::{mpsc, watch},
	task::AbortHandle,
	time::{interval, interval_at, Instant, MissedTickBehavior},
};

pub const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_millis(60_000);

#[derive(Clone, Debug)]
pub struct Options {
	pub snapshot_interval: Duration,
	pub stats_interval: Duration,
	/// Relay switched back on by a theft reset.
	pub main_relay: u8,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
			stats_interval: DEFAULT_STATS_INTERVAL,
			main_relay: meterwire::RELAY_COUNT,
		}
	}
}

/// Result of a spawned network call.
#[derive(Debug)]
enum Completion {
	Snapshot {
		generation: u64,
		result: Result<Snapshot, ApiError>,
	},
	Stats {
		generation: u64,
		range: TimeRange,
		result: Result<StatisticsSummary, ApiError>,
	},
	History {
		generation: u64,
		range: TimeRange,
		result: Result<Vec<Snapshot>, ApiError>,
	},
	Settings(Result<RelaySettings, ApiError>),
	Relay {
		toggle: PendingToggle,
		result: Result<Acknowledgement, ApiError>,
	},
	Price {
		price: f64,
		result: Result<Acknowledgement, ApiError>,
	},
}

/// An outstanding fetch that newer requests replace.
#[derive(Debug)]
struct InFlight {
	generation: u64,
	handle: AbortHandle,
}

pub struct PollingScheduler<S, R> {
	service: Arc<S>,
	render: R,
	session: Session,
	options: Options,
	completions: mpsc::UnboundedSender<Completion>,

	snapshot_task: Option<InFlight>,
	stats_task: Option<InFlight>,
	history_task: Option<InFlight>,
	generation: u64,
}

impl<S, R> PollingScheduler<S, R>
where
	S: DataService + 'static,
	R: Render,
{
	/// Runs the dashboard until `shutdown` fires, then returns the session.
	///
	/// On start the relay settings and the history of the session's range
	/// are loaded, and the first latest-reading poll goes out immediately.
	pub async fn run(
		service: Arc<S>,
		render: R,
		session: Session,
		options: Options,
		mut intents: mpsc::Receiver<Intent>,
		mut shutdown: watch::Receiver<bool>,
	) -> Session {
		let (completions, mut completions_rx) = mpsc::unbounded_channel();
		let mut scheduler = Self {
			service,
			render,
			session,
			options,
			completions,
			snapshot_task: None,
			stats_task: None,
			history_task: None,
			generation: 0,
		};

		let mut snapshot_interval = interval(scheduler.options.snapshot_interval);
		snapshot_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
		let stats_period = scheduler.options.stats_interval;
		let mut stats_interval = interval_at(Instant::now() + stats_period, stats_period);
		stats_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

		tracing::info!("starting dashboard, {} view", scheduler.session.range());
		scheduler.request_settings();
		scheduler.request_history();

		loop {
			tokio::select! {
				biased;

				_ = shutdown.changed() => {
					tracing::info!("shutting down dashboard");
					break;
				}
				Some(completion) = completions_rx.recv() => {
					scheduler.complete(completion);
				}
				Some(intent) = intents.recv() => {
					scheduler.handle_intent(intent);
				}
				_ = snapshot_interval.tick() => {
					scheduler.poll_snapshot();
				}
				_ = stats_interval.tick() => {
					scheduler.poll_stats();
				}
			}
		}

		scheduler.abort_outstanding();
		scheduler.session
	}

	fn spawn<F, Fut>(&self, call: F) -> AbortHandle
	where
		F: FnOnce(Arc<S>) -> Fut,
		Fut: std::future::Future<Output = Completion> + Send + 'static,
	{
		let completions = self.completions.clone();
		let future = call(Arc::clone(&self.service));
		tokio::spawn(async move {
			// The receiver only goes away once the scheduler has stopped.
			let _ = completions.send(future.await);
		})
		.abort_handle()
	}

	fn next_generation(&mut self) -> u64 {
		self.generation += 1;
		self.generation
	}

	/// Fetches the latest reading. A fetch still outstanding after a whole
	/// period counts as failed and is replaced.
	fn poll_snapshot(&mut self) {
		if let Some(stalled) = self.snapshot_task.take() {
			stalled.handle.abort();
			tracing::warn!("latest-reading fetch outstanding for a whole period, replacing it");
			self.record_offline();
		}
		let generation = self.next_generation();
		let handle = self.spawn(move |service| async move {
			Completion::Snapshot {
				generation,
				result: service.latest().await,
			}
		});
		self.snapshot_task = Some(InFlight { generation, handle });
	}

	fn poll_stats(&mut self) {
		if self.stats_task.is_some() {
			tracing::trace!("previous statistics fetch outstanding, skipping tick");
			return;
		}
		self.request_stats();
	}

	/// Fetches statistics for the current range, replacing any fetch still
	/// outstanding.
	fn request_stats(&mut self) {
		if let Some(previous) = self.stats_task.take() {
			previous.handle.abort();
		}
		let generation = self.next_generation();
		let range = self.session.range();
		let handle = self.spawn(move |service| async move {
			Completion::Stats {
				generation,
				range,
				result: service.stats(range).await,
			}
		});
		self.stats_task = Some(InFlight { generation, handle });
	}

	/// Loads the history of the current range, replacing any load still
	/// outstanding.
	fn request_history(&mut self) {
		if let Some(previous) = self.history_task.take() {
			tracing::debug!("replacing outstanding history fetch");
			previous.handle.abort();
		}
		let generation = self.next_generation();
		let range = self.session.range();
		let handle = self.spawn(move |service| async move {
			Completion::History {
				generation,
				range,
				result: fetch_history(service.as_ref(), range).await,
			}
		});
		self.history_task = Some(InFlight { generation, handle });
		self.session.backfill_pending = true;
	}

	fn request_settings(&mut self) {
		self.spawn(|service| async move { Completion::Settings(service.relay_settings().await) });
	}

	fn handle_intent(&mut self, intent: Intent) {
		tracing::debug!("operator intent: {intent:?}");
		match intent {
			Intent::ToggleRelay { relay, state } => self.toggle_relay(relay, state),
			Intent::SetPrice(price) => self.update_price(price),
			Intent::ChangeRange(range) => {
				self.session.set_range(range);
				self.request_history();
			}
			Intent::ResetTheft => {
				tracing::info!("resetting theft alert, switching relay {} on", self.options.main_relay);
				self.toggle_relay(self.options.main_relay, RelayState::On);
			}
		}
	}

	fn toggle_relay(&mut self, relay: u8, state: RelayState) {
		let toggle = match self.session.actuators.begin(relay, state) {
			Ok(toggle) => toggle,
			Err(error) => {
				self.render.notify(Notice::RelayRejected(error.to_string()));
				return;
			}
		};
		self.render.redraw(&self.session, Redraw::Incremental);

		tracing::info!("switching relay {relay} {state}");
		self.spawn(move |service| async move {
			Completion::Relay {
				toggle,
				result: service.control_relay(toggle.command()).await,
			}
		});
	}

	fn update_price(&mut self, price: f64) {
		let price = match validate_price(price) {
			Ok(price) => price,
			Err(error) => {
				tracing::debug!("{error}");
				self.render.notify(Notice::PriceRejected(error.to_string()));
				return;
			}
		};

		tracing::info!("updating price to {price} per kWh");
		self.spawn(move |service| async move {
			Completion::Price {
				price,
				result: service.update_price(price).await,
			}
		});
	}

	fn complete(&mut self, completion: Completion) {
		match completion {
			Completion::Snapshot { generation, result } => {
				if !take_if_current(&mut self.snapshot_task, generation) {
					tracing::debug!("discarding superseded latest reading");
					return;
				}
				self.complete_snapshot(result);
			}
			Completion::Stats {
				generation,
				range,
				result,
			} => {
				if !take_if_current(&mut self.stats_task, generation) {
					tracing::debug!("discarding superseded {range} statistics");
					return;
				}
				match result {
					Ok(summary) => {
						tracing::debug!("received {range} statistics: {summary:?}");
						self.session.statistics.merge(&summary);
						self.render.redraw(&self.session, Redraw::Incremental);
					}
					Err(error) => tracing::error!("error fetching {range} statistics: {error}"),
				}
			}
			Completion::History {
				generation,
				range,
				result,
			} => {
				if !take_if_current(&mut self.history_task, generation) {
					tracing::debug!("discarding superseded {range} history");
					return;
				}
				self.session.backfill_pending = false;
				self.complete_history(range, result);
			}
			Completion::Settings(result) => match result {
				Ok(settings) => {
					tracing::debug!("received relay settings: {settings:?}");
					self.session.actuators.sync(settings.relays().map(RelayState::from));
					self.session.stored_price = settings.price.or(self.session.stored_price);
					self.render.redraw(&self.session, Redraw::Incremental);
				}
				Err(error) => tracing::error!("error fetching relay settings: {error}"),
			},
			Completion::Relay { toggle, result } => {
				let relay = toggle.relay;
				match result {
					Ok(_) => {
						self.session.actuators.commit(toggle);
						self.render.notify(Notice::RelayConfirmed {
							relay,
							state: toggle.attempted,
						});
					}
					Err(error) => {
						let state = self.session.actuators.rollback(toggle);
						tracing::warn!("relay {relay} command failed, reverted to {state}: {error}");
						self.render.notify(Notice::RelayRolledBack { relay, state });
						self.render.redraw(&self.session, Redraw::Incremental);
					}
				}
			}
			Completion::Price { price, result } => match result {
				Ok(_) => self.render.notify(Notice::PriceUpdated(price)),
				Err(error) => {
					tracing::error!("error updating price: {error}");
					self.render.notify(Notice::PriceFailed(error.to_string()));
				}
			},
		}
	}

	fn complete_snapshot(&mut self, result: Result<Snapshot, ApiError>) {
		match result {
			Ok(snapshot) => {
				let range = self.session.range();
				if let Err(error) = ingest_snapshot(&mut self.session, &snapshot, range) {
					tracing::error!("error charting reading: {error}");
				}
				self.render.redraw(&self.session, Redraw::Incremental);
			}
			Err(error) => {
				// The service answers 404 until the meter first reports.
				if error.is_transport() {
					tracing::warn!("error fetching latest reading: {error}");
				} else {
					tracing::debug!("error fetching latest reading: {error}");
				}
				self.record_offline();
			}
		}
	}

	fn record_offline(&mut self) {
		if self.session.connection.record(ConnectionStatus::Offline) {
			self.render.redraw(&self.session, Redraw::Incremental);
		}
	}

	fn complete_history(&mut self, range: TimeRange, result: Result<Vec<Snapshot>, ApiError>) {
		let rows = match result {
			Ok(rows) => rows,
			Err(error) => {
				tracing::error!("error loading {range} history: {error}");
				// The charts stay as they were, so readings held back during
				// the fetch go straight onto them.
				match chart_deferred(&mut self.session, None) {
					Ok(0) => {}
					Ok(_) => self.render.redraw(&self.session, Redraw::Incremental),
					Err(error) => tracing::error!("error charting deferred readings: {error}"),
				}
				return;
			}
		};

		match apply_history(&mut self.session, &rows) {
			Ok(_) => {
				let last = rows.last().map(|row| row.timestamp);
				if let Err(error) = chart_deferred(&mut self.session, last) {
					tracing::error!("error charting deferred readings: {error}");
				}
				self.render.redraw(&self.session, Redraw::Full);
				self.request_stats();
			}
			Err(error) => tracing::error!("error charting {range} history: {error}"),
		}
	}

	fn abort_outstanding(&mut self) {
		for task in [
			self.snapshot_task.take(),
			self.stats_task.take(),
			self.history_task.take(),
		]
		.into_iter()
		.flatten()
		{
			task.handle.abort();
		}
	}
}

/// Clears `slot` if it holds the fetch of `generation`. Returns whether the
/// result belongs to the current fetch.
fn take_if_current(slot: &mut Option<InFlight>, generation: u64) -> bool {
	let current = slot.as_ref().map(|in_flight| in_flight.generation) == Some(generation);
	if current {
		*slot = None;
	}
	current
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use meterwire::{HistoryWindow, RelayCommand};
	use pretty_assertions::assert_eq;
	use std::sync::Mutex;
	use time::macros::datetime;
	use tokio::{task::JoinHandle, time::sleep};

	#[derive(Clone, Debug, PartialEq)]
	enum Call {
		Latest,
		Stats(TimeRange),
		History(HistoryWindow),
		Settings,
		Relay(RelayCommand),
		Price(f64),
	}

	/// What the fake does once its answers run out.
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	enum Exhausted {
		#[default]
		Fail,
		Hang,
	}

	#[derive(Default)]
	struct FakeService {
		calls: Mutex<Vec<Call>>,
		/// `None` answers 404, like the service before the first reading.
		latest: Option<Snapshot>,
		/// Number of latest fetches answered from `latest`, unlimited if
		/// `None`.
		latest_answers: Option<usize>,
		latest_exhausted: Exhausted,
		/// Number of statistics fetches that succeed, unlimited if `None`.
		stats_answers: Option<usize>,
		/// `None` answers 500.
		history: Option<Vec<Snapshot>>,
		settings: Option<RelaySettings>,
		commands_fail: bool,
	}

	fn unavailable() -> ApiError {
		ApiError::Status {
			status: 500,
			body: "unavailable".into(),
		}
	}

	impl FakeService {
		fn record(&self, call: Call) {
			self.calls.lock().unwrap().push(call);
		}

		fn calls(&self) -> Vec<Call> {
			self.calls.lock().unwrap().clone()
		}

		fn count(&self, call: &Call) -> usize {
			self.calls().iter().filter(|c| *c == call).count()
		}

		fn stats_calls(&self) -> usize {
			self.calls()
				.iter()
				.filter(|c| matches!(c, Call::Stats(_)))
				.count()
		}

		fn position(&self, call: &Call) -> Option<usize> {
			self.calls().iter().position(|c| c == call)
		}

		fn command_result(&self) -> Result<Acknowledgement, ApiError> {
			if self.commands_fail {
				Err(unavailable())
			} else {
				Ok(Acknowledgement {
					status: Some("success".into()),
					message: None,
				})
			}
		}
	}

	#[async_trait]
	impl DataService for FakeService {
		async fn latest(&self) -> Result<Snapshot, ApiError> {
			self.record(Call::Latest);
			let call = self.count(&Call::Latest);
			if self.latest_answers.map_or(false, |answers| call > answers) {
				if self.latest_exhausted == Exhausted::Hang {
					std::future::pending::<()>().await;
				}
				return Err(unavailable());
			}
			self.latest.clone().ok_or(ApiError::Status {
				status: 404,
				body: r#"{"status": "no data"}"#.into(),
			})
		}

		async fn stats(&self, range: TimeRange) -> Result<StatisticsSummary, ApiError> {
			self.record(Call::Stats(range));
			if self
				.stats_answers
				.map_or(false, |answers| self.stats_calls() > answers)
			{
				return Err(unavailable());
			}
			Ok(StatisticsSummary {
				avg_voltage: Some(230.0),
				..Default::default()
			})
		}

		async fn history(&self, window: HistoryWindow) -> Result<Vec<Snapshot>, ApiError> {
			self.record(Call::History(window));
			self.history.clone().ok_or_else(unavailable)
		}

		async fn relay_settings(&self) -> Result<RelaySettings, ApiError> {
			self.record(Call::Settings);
			self.settings.clone().ok_or_else(unavailable)
		}

		async fn control_relay(&self, command: RelayCommand) -> Result<Acknowledgement, ApiError> {
			self.record(Call::Relay(command));
			self.command_result()
		}

		async fn update_price(&self, price: f64) -> Result<Acknowledgement, ApiError> {
			self.record(Call::Price(price));
			self.command_result()
		}
	}

	#[derive(Clone, Default)]
	struct Recorder {
		redraws: Arc<Mutex<Vec<(Redraw, usize)>>>,
		notices: Arc<Mutex<Vec<Notice>>>,
	}

	impl Recorder {
		fn notices(&self) -> Vec<Notice> {
			self.notices.lock().unwrap().clone()
		}

		fn last_len(&self) -> Option<usize> {
			self.redraws.lock().unwrap().last().map(|(_, len)| *len)
		}

		fn saw(&self, redraw: Redraw) -> bool {
			self.redraws.lock().unwrap().iter().any(|(r, _)| *r == redraw)
		}
	}

	impl Render for Recorder {
		fn redraw(&mut self, session: &Session, redraw: Redraw) {
			self.redraws
				.lock()
				.unwrap()
				.push((redraw, session.series().len()));
		}

		fn notify(&mut self, notice: Notice) {
			self.notices.lock().unwrap().push(notice);
		}
	}

	struct Harness {
		intents: mpsc::Sender<Intent>,
		shutdown: watch::Sender<bool>,
		handle: JoinHandle<Session>,
	}

	impl Harness {
		fn start(service: &Arc<FakeService>, render: &Recorder) -> Self {
			let (intents, intents_rx) = mpsc::channel(8);
			let (shutdown, shutdown_rx) = watch::channel(false);
			let handle = tokio::spawn(PollingScheduler::run(
				Arc::clone(service),
				render.clone(),
				Session::default(),
				Options::default(),
				intents_rx,
				shutdown_rx,
			));
			Self {
				intents,
				shutdown,
				handle,
			}
		}

		async fn send(&self, intent: Intent) {
			self.intents.send(intent).await.unwrap();
		}

		async fn stop(self) -> Session {
			self.shutdown.send(true).unwrap();
			self.handle.await.unwrap()
		}
	}

	fn rows(count: i64) -> Vec<Snapshot> {
		(0..count)
			.map(|hour| {
				let mut row = Snapshot::at(datetime!(2024-05-01 00:00) + time::Duration::hours(hour));
				row.total_power = Some(hour as f64);
				row
			})
			.collect()
	}

	fn settings(relays: [bool; 3], price: f64) -> RelaySettings {
		RelaySettings {
			relay1: relays[0],
			relay2: relays[1],
			relay3: relays[2],
			price: Some(price),
			timestamp: None,
		}
	}

	#[tokio::test(start_paused = true)]
	async fn day_history_fills_charts_and_refreshes_day_statistics() {
		let service = Arc::new(FakeService {
			history: Some(rows(24)),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(5000)).await;
		let session = harness.stop().await;

		for group in crate::series::SeriesGroup::ALL {
			assert_eq!(session.series().group(group).len(), 24);
		}
		let history = service.position(&Call::History(HistoryWindow::Hours(24)));
		let stats = service.position(&Call::Stats(TimeRange::Day));
		assert!(history.is_some() && stats.is_some());
		assert!(history < stats);
		assert!(render.saw(Redraw::Full));
		assert_eq!(session.statistics().avg_voltage, Some(230.0));
		assert!(!session.is_backfill_pending());
	}

	#[tokio::test(start_paused = true)]
	async fn failed_latest_fetch_goes_offline_and_keeps_charts() {
		let service = Arc::new(FakeService {
			history: Some(rows(3)),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(4500)).await;
		let session = harness.stop().await;

		assert_eq!(service.count(&Call::Latest), 3);
		assert_eq!(session.connection(), ConnectionStatus::Offline);
		assert_eq!(session.series().len(), 3);
		assert!(session.readings().is_none());
	}

	#[tokio::test(start_paused = true)]
	async fn failed_latest_fetch_keeps_earlier_readings() {
		let mut latest = Snapshot::at(datetime!(2024-05-02 12:00));
		latest.total_power = Some(99.0);
		let service = Arc::new(FakeService {
			latest: Some(latest),
			latest_answers: Some(2),
			history: Some(rows(2)),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(4500)).await;
		let session = harness.stop().await;

		assert_eq!(service.count(&Call::Latest), 3);
		assert_eq!(session.connection(), ConnectionStatus::Offline);
		assert_eq!(session.readings().map(|r| r.total_power), Some(99.0));
		assert_eq!(session.series().len(), 4);
	}

	#[tokio::test(start_paused = true)]
	async fn failed_statistics_keep_display_and_status() {
		let service = Arc::new(FakeService {
			latest: Some(Snapshot::at(datetime!(2024-05-02 12:00))),
			history: Some(rows(2)),
			stats_answers: Some(1),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(500)).await;
		harness.send(Intent::ChangeRange(TimeRange::Week)).await;
		sleep(Duration::from_millis(500)).await;
		let session = harness.stop().await;

		assert_eq!(service.count(&Call::Stats(TimeRange::Day)), 1);
		assert_eq!(service.count(&Call::Stats(TimeRange::Week)), 1);
		assert_eq!(session.statistics().avg_voltage, Some(230.0));
		assert_eq!(session.connection(), ConnectionStatus::Online);
	}

	#[tokio::test(start_paused = true)]
	async fn live_readings_follow_history() {
		let mut latest = Snapshot::at(datetime!(2024-05-02 12:00));
		latest.total_power = Some(99.0);
		let service = Arc::new(FakeService {
			latest: Some(latest),
			history: Some(rows(2)),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(4500)).await;
		let session = harness.stop().await;

		assert_eq!(session.connection(), ConnectionStatus::Online);
		assert!(session.series().len() >= 4);
		let power = session
			.series()
			.group(crate::series::SeriesGroup::Power)
			.channel(2);
		assert_eq!(power.back(), Some(&Some(99.0)));
		assert_eq!(power.front(), Some(&Some(0.0)));
	}

	#[tokio::test(start_paused = true)]
	async fn stalled_latest_fetch_is_replaced_and_goes_offline() {
		let mut latest = Snapshot::at(datetime!(2024-05-02 12:00));
		latest.total_power = Some(99.0);
		let service = Arc::new(FakeService {
			latest: Some(latest),
			latest_answers: Some(1),
			latest_exhausted: Exhausted::Hang,
			history: Some(Vec::new()),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_secs(600)).await;
		let session = harness.stop().await;

		// One poll per tick keeps going out while every fetch hangs.
		assert!(service.count(&Call::Latest) >= 290);
		assert_eq!(session.connection(), ConnectionStatus::Offline);
		let readings = session.readings().unwrap();
		assert_eq!(readings.total_power, 99.0);
	}

	#[tokio::test(start_paused = true)]
	async fn latest_fetch_that_never_answers_goes_offline() {
		let service = Arc::new(FakeService {
			latest: Some(Snapshot::at(datetime!(2024-05-02 12:00))),
			latest_answers: Some(0),
			latest_exhausted: Exhausted::Hang,
			history: Some(Vec::new()),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(2500)).await;
		let session = harness.stop().await;

		assert_eq!(service.count(&Call::Latest), 2);
		assert_eq!(session.connection(), ConnectionStatus::Offline);
		assert!(session.readings().is_none());
	}

	#[tokio::test(start_paused = true)]
	async fn failed_relay_commands_roll_back_both_directions() {
		let service = Arc::new(FakeService {
			history: Some(Vec::new()),
			settings: Some(settings([true, false, false], 5.0)),
			commands_fail: true,
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(100)).await;
		harness
			.send(Intent::ToggleRelay {
				relay: 1,
				state: RelayState::Off,
			})
			.await;
		harness
			.send(Intent::ToggleRelay {
				relay: 2,
				state: RelayState::On,
			})
			.await;
		sleep(Duration::from_millis(100)).await;
		let session = harness.stop().await;

		assert_eq!(session.actuators().state(1), Some(RelayState::On));
		assert_eq!(session.actuators().state(2), Some(RelayState::Off));
		assert!(!session.actuators().is_pending(1));
		assert_eq!(
			service.count(&Call::Relay(RelayCommand {
				relay: 1,
				state: false
			})),
			1
		);
		let notices = render.notices();
		assert!(notices.contains(&Notice::RelayRolledBack {
			relay: 1,
			state: RelayState::On
		}));
		assert!(notices.contains(&Notice::RelayRolledBack {
			relay: 2,
			state: RelayState::Off
		}));
	}

	#[tokio::test(start_paused = true)]
	async fn theft_reset_switches_main_relay_on() {
		let service = Arc::new(FakeService {
			history: Some(Vec::new()),
			settings: Some(settings([true, true, false], 5.0)),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(100)).await;
		harness.send(Intent::ResetTheft).await;
		sleep(Duration::from_millis(100)).await;
		let session = harness.stop().await;

		assert_eq!(session.actuators().state(3), Some(RelayState::On));
		assert_eq!(
			service.count(&Call::Relay(RelayCommand {
				relay: 3,
				state: true
			})),
			1
		);
		assert!(render.notices().contains(&Notice::RelayConfirmed {
			relay: 3,
			state: RelayState::On
		}));
	}

	#[tokio::test(start_paused = true)]
	async fn invalid_prices_never_reach_the_service() {
		let service = Arc::new(FakeService {
			history: Some(Vec::new()),
			settings: Some(settings([false; 3], 5.0)),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(100)).await;
		harness.send(Intent::SetPrice(-5.0)).await;
		harness.send(Intent::SetPrice(f64::NAN)).await;
		harness.send(Intent::SetPrice(6.5)).await;
		sleep(Duration::from_millis(100)).await;
		let session = harness.stop().await;

		let prices: Vec<Call> = service
			.calls()
			.into_iter()
			.filter(|call| matches!(call, Call::Price(_)))
			.collect();
		assert_eq!(prices, vec![Call::Price(6.5)]);
		assert_eq!(session.stored_price(), Some(5.0));

		let notices = render.notices();
		let rejected = notices
			.iter()
			.filter(|n| matches!(n, Notice::PriceRejected(_)))
			.count();
		assert_eq!(rejected, 2);
		assert!(notices.contains(&Notice::PriceUpdated(6.5)));
	}

	#[tokio::test(start_paused = true)]
	async fn range_change_reloads_history_for_the_new_range() {
		let service = Arc::new(FakeService {
			history: Some(rows(7)),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(100)).await;
		harness.send(Intent::ChangeRange(TimeRange::Week)).await;
		sleep(Duration::from_millis(100)).await;
		let session = harness.stop().await;

		assert_eq!(session.range(), TimeRange::Week);
		let history = service.position(&Call::History(HistoryWindow::Days(7)));
		let stats = service.position(&Call::Stats(TimeRange::Week));
		assert!(history.is_some() && stats.is_some());
		assert!(history < stats);
	}

	#[tokio::test(start_paused = true)]
	async fn failed_history_leaves_charts_untouched() {
		let service = Arc::new(FakeService {
			latest: Some(Snapshot::at(datetime!(2024-05-02 12:00))),
			..Default::default()
		});
		let render = Recorder::default();
		let harness = Harness::start(&service, &render);

		sleep(Duration::from_millis(4500)).await;
		let before = render.last_len().unwrap_or_default();
		harness.send(Intent::ChangeRange(TimeRange::Month)).await;
		sleep(Duration::from_millis(500)).await;
		let session = harness.stop().await;

		assert!(before > 0);
		assert_eq!(session.series().len(), before);
		assert_eq!(service.count(&Call::History(HistoryWindow::Days(30))), 1);
		assert!(!session.is_backfill_pending());
		assert_eq!(session.connection(), ConnectionStatus::Online);
	}
}
