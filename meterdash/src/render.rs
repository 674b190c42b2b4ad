//! Seam between the dashboard state and whatever draws it.

use crate::{series::SeriesGroup, session::Session, util::time_label};
use meterwire::RelayState;
use serde::Serialize;
use std::fmt;

/// What changed since the last redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
	/// A live reading, a status change or a relay change. Drawn without
	/// animation.
	Incremental,
	/// The charts were replaced from history.
	Full,
}

/// Feedback for the operator.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
	RelayConfirmed { relay: u8, state: RelayState },
	RelayRolledBack { relay: u8, state: RelayState },
	RelayRejected(String),
	PriceUpdated(f64),
	PriceRejected(String),
	PriceFailed(String),
}

impl fmt::Display for Notice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::RelayConfirmed { relay, state } => write!(f, "relay {relay} switched {state}"),
			Self::RelayRolledBack { relay, state } => {
				write!(f, "relay {relay} command failed, relay shown {state} again")
			}
			Self::RelayRejected(reason) => write!(f, "relay command rejected: {reason}"),
			Self::PriceUpdated(price) => write!(f, "price updated to {price} per kWh"),
			Self::PriceRejected(reason) => write!(f, "please enter a valid price: {reason}"),
			Self::PriceFailed(reason) => write!(f, "failed to update price: {reason}"),
		}
	}
}

/// Draws the dashboard. Called by the scheduler after every change.
pub trait Render: Send {
	fn redraw(&mut self, session: &Session, redraw: Redraw);

	fn notify(&mut self, notice: Notice);
}

/// The dashboard rendered as lines of text.
#[derive(Debug, Serialize)]
pub struct Page {
	pub lines: Vec<String>,
}

impl Page {
	pub fn from_session(session: &Session) -> Self {
		let mut lines = Vec::with_capacity(10);

		let updated = session
			.readings()
			.and_then(|r| r.timestamp)
			.map(time_label)
			.unwrap_or_else(|| "--:--:--".into());
		lines.push(format!(
			"{} | range {} | updated {updated}",
			session.connection(),
			session.range()
		));

		if let Some(r) = session.readings() {
			lines.push(format!("Voltage  {:.2} V", r.voltage));
			lines.push(format!(
				"Current  {:.3} A | {:.3} A | {:.3} A | total {:.3} A",
				r.current1, r.current2, r.current3, r.total_current
			));
			lines.push(format!(
				"Power    {:.2} W | {:.2} W | total {:.2} W",
				r.power1, r.power2, r.total_power
			));
			lines.push(format!(
				"Energy   {:.3} kWh | {:.3} kWh | total {:.3} kWh",
				r.energy_l1, r.energy_l2, r.total_energy
			));
			lines.push(format!(
				"Cost     {:.2} | {:.2} | total {:.2}",
				r.cost_l1, r.cost_l2, r.total_cost
			));
			if r.theft_alert {
				lines.push("THEFT DETECTED! Main relay disabled. Send 'reset-theft' to reset.".into());
			}
		}

		let actuators = session.actuators();
		let relays: Vec<String> = actuators
			.states()
			.iter()
			.enumerate()
			.map(|(index, state)| {
				let relay = index as u8 + 1;
				let marker = if actuators.is_pending(relay) { "*" } else { "" };
				format!("{relay}:{state}{marker}")
			})
			.collect();
		lines.push(format!("Relays   {}", relays.join(" ")));

		let stats = session.statistics();
		let stat = |value: Option<f64>, precision: usize, unit: &str| {
			value.map_or_else(|| "--".to_string(), |v| format!("{v:.precision$}{unit}"))
		};
		lines.push(format!(
			"Stats    avg {} | avg {} | max {} | energy {}",
			stat(stats.avg_voltage, 1, "V"),
			stat(stats.avg_current, 2, "A"),
			stat(stats.max_power, 1, "W"),
			stat(stats.total_energy_kwh, 3, "kWh"),
		));
		lines.push(format!(
			"Price    {}",
			stat(session.stored_price(), 2, " per kWh")
		));

		let series = session.series();
		let groups: Vec<&str> = SeriesGroup::ALL.iter().map(|g| g.name()).collect();
		lines.push(format!(
			"Charts   {} points ({})",
			series.len(),
			groups.join(", ")
		));

		Self { lines }
	}
}
