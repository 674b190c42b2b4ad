mod config;
mod tasks;

use clap::Parser;
use config::Config;
use meterapi::Client;
use meterdash::{scheduler::PollingScheduler, session::Session};
use std::{
	fs::File,
	path::{Path, PathBuf},
	sync::Arc,
};
use tasks::display::ConsoleRender;
use tokio::sync::{mpsc, watch};

#[derive(Parser)]
pub struct Arguments {
	#[clap(env = "METERDASH_CONFIG_PATH")]
	config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt::init();

	let arguments = Arguments::parse();
	let (shutdown_tx, shutdown_rx) = watch::channel(false);

	// Read the configuration file
	let config = load_config(arguments.config)?;
	config.validate()?;

	// Setup the data service client.
	let client = Arc::new(Client::new(config.api.url.clone())?);
	tracing::info!("using data service at {}", client.base());

	// Operator commands arrive on stdin.
	let (intents_tx, intents_rx) = mpsc::channel(16);
	let operator_task = tasks::operator::create_task(intents_tx, shutdown_rx.clone());

	let session = Session::new(config.initial_range, config.chart.capacity);
	let mut dashboard_task = tokio::spawn(PollingScheduler::run(
		client,
		ConsoleRender::stdout(config.display.format),
		session,
		config.scheduler_options(),
		intents_rx,
		shutdown_rx,
	));

	tokio::select! {
		_ = tokio::signal::ctrl_c() => {
			tracing::debug!("received ctrl-c, closing");
			shutdown_tx.send(true)?;
		}
		result = &mut dashboard_task => {
			// The scheduler only stops on shutdown.
			result?;
			anyhow::bail!("dashboard stopped unexpectedly");
		}
	}

	let session = dashboard_task.await?;
	tracing::info!(
		"dashboard stopped with {} chart points, {}",
		session.series().len(),
		session.connection()
	);

	operator_task.await??;

	Ok(())
}

fn load_config<T: AsRef<Path>>(path: T) -> anyhow::Result<Config> {
	let path = path.as_ref();
	let config_file = File::open(path)?;
	let config = match path.extension().and_then(|s| s.to_str()) {
		Some("yaml") | Some("yml") => serde_yaml::from_reader(config_file)?,
		Some("json") => serde_json::from_reader(config_file)?,
		None | Some(_) => anyhow::bail!("unknown config file extension: {}", path.display()),
	};
	Ok(config)
}
