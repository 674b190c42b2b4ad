//! The "current readings" shown next to the charts.

use meterwire::{RelayState, Snapshot, StatisticsSummary, RELAY_COUNT};
use time::PrimitiveDateTime;

/// Scalar values of the latest reading, ready for display.
///
/// This is the one place absent measurements are replaced with 0. The series
/// buffers keep them as gaps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurrentReadings {
	pub timestamp: Option<PrimitiveDateTime>,
	pub voltage: f64,
	pub current1: f64,
	pub current2: f64,
	pub current3: f64,
	pub total_current: f64,
	pub power1: f64,
	pub power2: f64,
	pub total_power: f64,
	pub energy_l1: f64,
	pub energy_l2: f64,
	pub total_energy: f64,
	pub cost_l1: f64,
	pub cost_l2: f64,
	pub total_cost: f64,
	/// Relay states as reported by the meter.
	pub relays: [RelayState; RELAY_COUNT as usize],
	pub theft_alert: bool,
}

impl From<&Snapshot> for CurrentReadings {
	fn from(snapshot: &Snapshot) -> Self {
		let or_zero = |value: Option<f64>| value.unwrap_or(0.0);
		Self {
			timestamp: Some(snapshot.timestamp),
			voltage: or_zero(snapshot.voltage),
			current1: or_zero(snapshot.current1),
			current2: or_zero(snapshot.current2),
			current3: or_zero(snapshot.current3),
			total_current: or_zero(snapshot.total_current),
			power1: or_zero(snapshot.power1),
			power2: or_zero(snapshot.power2),
			total_power: or_zero(snapshot.total_power),
			energy_l1: or_zero(snapshot.energy_l1),
			energy_l2: or_zero(snapshot.energy_l2),
			total_energy: or_zero(snapshot.total_energy),
			cost_l1: or_zero(snapshot.cost_l1),
			cost_l2: or_zero(snapshot.cost_l2),
			total_cost: or_zero(snapshot.total_cost),
			relays: snapshot.relay_states(),
			theft_alert: snapshot.is_theft_detected(),
		}
	}
}

/// Statistics as displayed. A field the service leaves out keeps its previous
/// value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatisticsDisplay {
	pub total_readings: Option<u64>,
	pub avg_voltage: Option<f64>,
	pub avg_current: Option<f64>,
	pub avg_power: Option<f64>,
	pub max_power: Option<f64>,
	pub min_power: Option<f64>,
	pub total_energy_kwh: Option<f64>,
	pub total_cost: Option<f64>,
}

impl StatisticsDisplay {
	pub fn merge(&mut self, summary: &StatisticsSummary) {
		fn keep<T: Copy>(slot: &mut Option<T>, value: Option<T>) {
			*slot = value.or(*slot);
		}

		keep(&mut self.total_readings, summary.total_readings);
		keep(&mut self.avg_voltage, summary.avg_voltage);
		keep(&mut self.avg_current, summary.avg_current);
		keep(&mut self.avg_power, summary.avg_power);
		keep(&mut self.max_power, summary.max_power);
		keep(&mut self.min_power, summary.min_power);
		keep(&mut self.total_energy_kwh, summary.total_energy_kwh);
		keep(&mut self.total_cost, summary.total_cost);
	}
}
