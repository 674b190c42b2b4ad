use crate::{ApiError, Client};
use async_trait::async_trait;
use meterwire::{
	Acknowledgement, HistoryWindow, RelayCommand, RelaySettings, Snapshot, StatisticsSummary,
	TimeRange,
};

/// The operations the dashboard needs from the data service.
///
/// [`Client`] implements this over HTTP.
#[async_trait]
pub trait DataService: Send + Sync {
	async fn latest(&self) -> Result<Snapshot, ApiError>;

	async fn stats(&self, range: TimeRange) -> Result<StatisticsSummary, ApiError>;

	async fn history(&self, window: HistoryWindow) -> Result<Vec<Snapshot>, ApiError>;

	async fn relay_settings(&self) -> Result<RelaySettings, ApiError>;

	async fn control_relay(&self, command: RelayCommand) -> Result<Acknowledgement, ApiError>;

	async fn update_price(&self, price: f64) -> Result<Acknowledgement, ApiError>;
}

#[async_trait]
impl DataService for Client {
	async fn latest(&self) -> Result<Snapshot, ApiError> {
		Client::latest(self).await
	}

	async fn stats(&self, range: TimeRange) -> Result<StatisticsSummary, ApiError> {
		Client::stats(self, range).await
	}

	async fn history(&self, window: HistoryWindow) -> Result<Vec<Snapshot>, ApiError> {
		Client::history(self, window).await
	}

	async fn relay_settings(&self) -> Result<RelaySettings, ApiError> {
		Client::relay_settings(self).await
	}

	async fn control_relay(&self, command: RelayCommand) -> Result<Acknowledgement, ApiError> {
		Client::control_relay(self, command).await
	}

	async fn update_price(&self, price: f64) -> Result<Acknowledgement, ApiError> {
		Client::update_price(self, price).await
	}
}
