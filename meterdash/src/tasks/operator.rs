use meterdash::operator::{Intent, OperatorParseError};
use std::io::BufRead;
use tokio::{
	sync::{mpsc, watch},
	task::JoinHandle,
};

pub fn create_task(
	intents: mpsc::Sender<Intent>,
	shutdown: watch::Receiver<bool>,
) -> JoinHandle<anyhow::Result<()>> {
	tracing::info!("starting operator input task");

	// Blocking stdin reads live on their own thread so they never hold up
	// runtime shutdown.
	let (lines_tx, lines_rx) = mpsc::channel(16);
	std::thread::spawn(move || {
		for line in std::io::stdin().lock().lines() {
			let Ok(line) = line else { break };
			if lines_tx.blocking_send(line).is_err() {
				break;
			}
		}
	});

	tokio::spawn(start_task(lines_rx, intents, shutdown))
}

/// Turns operator input lines into intents until input ends or shutdown.
pub async fn start_task(
	mut lines: mpsc::Receiver<String>,
	intents: mpsc::Sender<Intent>,
	mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
	loop {
		tokio::select! {
			line = lines.recv() => {
				let Some(line) = line else {
					tracing::info!("operator input closed");
					break;
				};
				match line.parse::<Intent>() {
					Ok(intent) => {
						if intents.send(intent).await.is_err() {
							break;
						}
					}
					Err(OperatorParseError::Empty) => continue,
					Err(error) => {
						tracing::warn!("ignoring operator input '{line}': {error}");
						eprintln!("{error}");
					}
				}
			}
			_ = shutdown.changed() => {
				tracing::info!("shutting down operator input task");
				break;
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use meterwire::{RelayState, TimeRange};
	use pretty_assertions::assert_eq;

	#[tokio::test]
	async fn forwards_parsed_commands_and_skips_bad_lines() {
		let (lines_tx, lines) = mpsc::channel(8);
		for line in ["relay 2 on", "", "bogus", "price abc", "range week", "reset-theft"] {
			lines_tx.send(line.to_string()).await.unwrap();
		}
		drop(lines_tx);
		let (intents, mut received) = mpsc::channel(8);
		let (_shutdown_tx, shutdown) = watch::channel(false);

		start_task(lines, intents, shutdown).await.unwrap();

		let mut all = Vec::new();
		while let Some(intent) = received.recv().await {
			all.push(intent);
		}
		assert_eq!(all.len(), 4);
		assert_eq!(
			all[0],
			Intent::ToggleRelay {
				relay: 2,
				state: RelayState::On
			}
		);
		assert!(matches!(all[1], Intent::SetPrice(price) if price.is_nan()));
		assert_eq!(all[2], Intent::ChangeRange(TimeRange::Week));
		assert_eq!(all[3], Intent::ResetTheft);
	}

	#[tokio::test]
	async fn stops_on_shutdown() {
		let (_lines_tx, lines) = mpsc::channel(8);
		let (intents, _received) = mpsc::channel(8);
		let (shutdown_tx, shutdown) = watch::channel(false);

		let task = tokio::spawn(start_task(lines, intents, shutdown));
		shutdown_tx.send(true).unwrap();
		task.await.unwrap().unwrap();
	}
}
