//! Operator commands: relay toggles with optimistic display, and price
//! updates.
//!
//! A toggle is applied to the displayed relay state before the data service
//! has seen it. The prior state is recorded so it can be restored if the
//! command fails.

use meterwire::{RelayCommand, RelayState, RELAY_COUNT};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown relay {0}, expected 1 to {max}", max = RELAY_COUNT)]
pub struct UnknownRelay(pub u8);

#[derive(Debug, Error)]
#[error("price must be a finite number greater than zero, got {0}")]
pub struct PriceRejected(pub f64);

/// Checks a price before it is sent to the data service.
pub fn validate_price(price: f64) -> Result<f64, PriceRejected> {
	if price.is_finite() && price > 0.0 {
		Ok(price)
	} else {
		Err(PriceRejected(price))
	}
}

/// A relay toggle that has been applied locally but not yet acknowledged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingToggle {
	id: u64,
	pub relay: u8,
	pub prior: RelayState,
	pub attempted: RelayState,
}

impl PendingToggle {
	pub fn command(&self) -> RelayCommand {
		RelayCommand {
			relay: self.relay,
			state: self.attempted.is_on(),
		}
	}
}

/// Displayed relay states, including toggles awaiting acknowledgement.
#[derive(Debug, Default)]
pub struct ActuatorBoard {
	visible: [RelayState; RELAY_COUNT as usize],
	pending: [Option<PendingToggle>; RELAY_COUNT as usize],
	next_id: u64,
}

fn slot(relay: u8) -> Result<usize, UnknownRelay> {
	match relay {
		1..=RELAY_COUNT => Ok(relay as usize - 1),
		_ => Err(UnknownRelay(relay)),
	}
}

impl ActuatorBoard {
	pub fn state(&self, relay: u8) -> Option<RelayState> {
		slot(relay).ok().map(|index| self.visible[index])
	}

	pub fn states(&self) -> [RelayState; RELAY_COUNT as usize] {
		self.visible
	}

	pub fn is_pending(&self, relay: u8) -> bool {
		slot(relay).map_or(false, |index| self.pending[index].is_some())
	}

	/// Records the current state of `relay` and displays `attempted` in its
	/// place.
	pub fn begin(&mut self, relay: u8, attempted: RelayState) -> Result<PendingToggle, UnknownRelay> {
		let index = slot(relay)?;
		self.next_id += 1;
		let toggle = PendingToggle {
			id: self.next_id,
			relay,
			prior: self.visible[index],
			attempted,
		};

		tracing::debug!("relay {relay}: {} -> {attempted} (pending)", toggle.prior);
		self.visible[index] = attempted;
		self.pending[index] = Some(toggle);
		Ok(toggle)
	}

	/// The data service accepted the toggle. The displayed state stands.
	pub fn commit(&mut self, toggle: PendingToggle) {
		let Ok(index) = slot(toggle.relay) else {
			return;
		};
		if self.pending[index].map(|p| p.id) == Some(toggle.id) {
			self.pending[index] = None;
		}
	}

	/// The toggle failed. Restores the state displayed before it and returns
	/// the state now displayed.
	///
	/// This is the recorded prior state, not the negation of the attempted
	/// one. The two only differ when the toggle asked for the state already
	/// shown, e.g. a theft reset of a main relay shown ON, and then the relay
	/// stays as it was shown.
	///
	/// If a later toggle of the same relay is still pending, only that
	/// toggle's recorded prior state is corrected, since the failed toggle
	/// never took effect.
	pub fn rollback(&mut self, toggle: PendingToggle) -> RelayState {
		let Ok(index) = slot(toggle.relay) else {
			return toggle.prior;
		};
		match self.pending[index].as_mut() {
			Some(pending) if pending.id == toggle.id => {
				self.visible[index] = pending.prior;
				self.pending[index] = None;
			}
			Some(pending) if pending.id > toggle.id => {
				pending.prior = toggle.prior;
			}
			_ => {}
		}
		self.visible[index]
	}

	/// Adopts the states reported by the meter for relays with no pending
	/// toggle.
	pub fn sync(&mut self, reported: [RelayState; RELAY_COUNT as usize]) {
		for (index, state) in reported.into_iter().enumerate() {
			if self.pending[index].is_none() {
				self.visible[index] = state;
			}
		}
	}
}
