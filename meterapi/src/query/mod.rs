//! Read endpoints of the data service.

use crate::{util::parse_json_payload, ApiError, Client};
use meterwire::{HistoryWindow, RelaySettings, Snapshot, StatisticsSummary, TimeRange};
use serde::de::DeserializeOwned;
use url::Url;

impl Client {
	/// Fetches the most recent reading.
	///
	/// The service answers 404 until the meter has reported at least once.
	pub async fn latest(&self) -> Result<Snapshot, ApiError> {
		self.get_json(self.endpoint(&["latest"])?).await
	}

	/// Fetches the aggregates over `range`.
	pub async fn stats(&self, range: TimeRange) -> Result<StatisticsSummary, ApiError> {
		self.get_json(self.stats_url(range)?).await
	}

	/// Fetches every reading inside `window`, oldest first.
	pub async fn history(&self, window: HistoryWindow) -> Result<Vec<Snapshot>, ApiError> {
		let rows: Vec<Snapshot> = self.get_json(self.history_url(window)?).await?;
		tracing::debug!("retrieved {} historical readings", rows.len());
		Ok(rows)
	}

	/// Fetches the relay states and stored price held by the service.
	pub async fn relay_settings(&self) -> Result<RelaySettings, ApiError> {
		self.get_json(self.endpoint(&["relay", "state"])?).await
	}

	pub(crate) fn stats_url(&self, range: TimeRange) -> Result<Url, ApiError> {
		let mut url = self.endpoint(&["stats"])?;
		url.query_pairs_mut().append_pair("period", range.as_str());
		Ok(url)
	}

	pub(crate) fn history_url(&self, window: HistoryWindow) -> Result<Url, ApiError> {
		let mut url = self.endpoint(&["history"])?;
		let (key, value) = window.query_pair();
		url.query_pairs_mut().append_pair(key, &value);
		Ok(url)
	}

	async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
		let path = url.path().to_string();
		let body = self.send(self.http().get(url)).await?;
		Ok(parse_json_payload(&path, body)?)
	}
}
