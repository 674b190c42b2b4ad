//! Command endpoints of the data service.
//!
//! Commands are sent once. There is no retry and no timeout beyond the
//! transport's own.

use crate::{ApiError, Client};
use bytes::Bytes;
use meterwire::{Acknowledgement, PriceCommand, RelayCommand};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Serialize;

impl Client {
	/// Switches a relay on the meter.
	pub async fn control_relay(&self, command: RelayCommand) -> Result<Acknowledgement, ApiError> {
		let url = self.endpoint(&["relay", "control"])?;
		let ack = self.post_json(url, &command).await?;
		tracing::info!(
			"relay {} command {} acknowledged",
			command.relay,
			if command.state { "ON" } else { "OFF" }
		);
		Ok(ack)
	}

	/// Stores a new price per kiloWatt hour.
	pub async fn update_price(&self, price: f64) -> Result<Acknowledgement, ApiError> {
		let url = self.endpoint(&["settings", "price"])?;
		let ack = self.post_json(url, &PriceCommand { price }).await?;
		tracing::info!("price update to {price} acknowledged");
		Ok(ack)
	}

	async fn post_json<B: Serialize>(
		&self,
		url: url::Url,
		body: &B,
	) -> Result<Acknowledgement, ApiError> {
		let body = serde_json::to_vec(body)?;
		let request = self
			.http()
			.post(url)
			.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
			.body(body);

		let response = self.send(request).await?;
		Ok(acknowledgement(response))
	}
}

/// Reads the acknowledgement from a success body. The status code alone
/// decides success, so an unreadable body is not an error.
fn acknowledgement(body: Bytes) -> Acknowledgement {
	match serde_json::from_slice(&body) {
		Ok(ack) => ack,
		Err(error) => {
			tracing::debug!("unreadable acknowledgement body: {error}");
			Acknowledgement::default()
		}
	}
}
