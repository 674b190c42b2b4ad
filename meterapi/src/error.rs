use thiserror::Error;

/// Failure talking to the data service.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The endpoint URL could not be derived from the configured base.
	#[error("invalid data service url: {0}")]
	Url(String),

	/// The request never produced a response.
	#[error("request error: {0}")]
	Transport(#[from] reqwest::Error),

	/// The service answered with a non-success status.
	#[error("data service responded {status}: {body}")]
	Status { status: u16, body: String },

	/// A success response carried a body we could not decode.
	#[error("json decode error: {0}")]
	Decode(#[from] serde_json::Error),
}

impl ApiError {
	/// Whether the service was reached at all.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}
