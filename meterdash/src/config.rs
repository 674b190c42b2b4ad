use meterdash::{scheduler::Options, series::DEFAULT_CAPACITY};
use meterwire::{TimeRange, RELAY_COUNT};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub api: ApiConfig,

	#[serde(default)]
	pub polling: PollingConfig,

	#[serde(default)]
	pub chart: ChartConfig,

	#[serde(default)]
	pub display: DisplayConfig,

	#[serde(default)]
	pub initial_range: TimeRange,

	/// Relay switched back on by `reset-theft`.
	#[serde(default = "default_main_relay")]
	pub main_relay: u8,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
	/// Base URL of the data service, e.g. `http://meter.local:5000/api`.
	pub url: Url,
}

#[derive(Debug, Deserialize)]
pub struct PollingConfig {
	#[serde(default = "default_snapshot_interval_ms")]
	pub snapshot_interval_ms: u64,

	#[serde(default = "default_stats_interval_ms")]
	pub stats_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChartConfig {
	#[serde(default = "default_capacity")]
	pub capacity: usize,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
	#[default]
	Text,
	Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct DisplayConfig {
	#[serde(default)]
	pub format: PageFormat,
}

fn default_snapshot_interval_ms() -> u64 {
	2000
}

fn default_stats_interval_ms() -> u64 {
	60_000
}

fn default_capacity() -> usize {
	DEFAULT_CAPACITY
}

fn default_main_relay() -> u8 {
	RELAY_COUNT
}

impl Default for PollingConfig {
	fn default() -> Self {
		Self {
			snapshot_interval_ms: default_snapshot_interval_ms(),
			stats_interval_ms: default_stats_interval_ms(),
		}
	}
}

impl Default for ChartConfig {
	fn default() -> Self {
		Self {
			capacity: default_capacity(),
		}
	}
}

impl Config {
	/// Rejects settings the dashboard cannot run with.
	pub fn validate(&self) -> anyhow::Result<()> {
		anyhow::ensure!(self.chart.capacity > 0, "chart capacity must be at least 1");
		anyhow::ensure!(
			self.polling.snapshot_interval_ms > 0 && self.polling.stats_interval_ms > 0,
			"polling intervals must be greater than zero"
		);
		anyhow::ensure!(
			(1..=RELAY_COUNT).contains(&self.main_relay),
			"main relay must be between 1 and {RELAY_COUNT}"
		);
		Ok(())
	}

	pub fn scheduler_options(&self) -> Options {
		Options {
			snapshot_interval: Duration::from_millis(self.polling.snapshot_interval_ms),
			stats_interval: Duration::from_millis(self.polling.stats_interval_ms),
			main_relay: self.main_relay,
		}
	}
}
