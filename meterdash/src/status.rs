use std::fmt;

/// Reachability of the data service, as seen by the latest-reading poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
	Online,
	#[default]
	Offline,
}

impl fmt::Display for ConnectionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Online => f.write_str("Online"),
			Self::Offline => f.write_str("Offline"),
		}
	}
}

/// Holds the connection flag. Only the outcome of a latest-reading fetch
/// should be fed in here.
#[derive(Debug, Default)]
pub struct ConnectionStatusTracker {
	status: ConnectionStatus,
}

impl ConnectionStatusTracker {
	pub fn status(&self) -> ConnectionStatus {
		self.status
	}

	/// Records the outcome of a fetch. Returns whether the status changed.
	pub fn record(&mut self, status: ConnectionStatus) -> bool {
		let changed = self.status != status;
		if changed {
			match status {
				ConnectionStatus::Online => tracing::info!("data service is online"),
				ConnectionStatus::Offline => tracing::warn!("data service is offline"),
			}
		}
		self.status = status;
		changed
	}
}
