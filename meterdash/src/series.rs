//! Bounded multi-channel time series backing the charts.
//!
//! Every group keeps one label array and one value array per channel. All of
//! them are mutated together so that index `i` of every array refers to the
//! same reading.

use meterwire::Snapshot;
use std::collections::VecDeque;
use thiserror::Error;

/// Number of points kept on the live charts.
pub const DEFAULT_CAPACITY: usize = 100;

/// A chart value. `None` is a gap where the meter did not report the channel.
pub type Value = Option<f64>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
	#[error("expected {expected} channel values, got {actual}")]
	ChannelCount { expected: usize, actual: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeriesGroup {
	Power,
	Current,
	Voltage,
	Energy,
}

impl SeriesGroup {
	pub const ALL: [SeriesGroup; 4] = [Self::Power, Self::Current, Self::Voltage, Self::Energy];

	pub fn name(&self) -> &'static str {
		match self {
			Self::Power => "power",
			Self::Current => "current",
			Self::Voltage => "voltage",
			Self::Energy => "energy",
		}
	}

	/// Names of the channels in this group, in storage order.
	pub fn channels(&self) -> &'static [&'static str] {
		match self {
			Self::Power => &["power1", "power2", "total_power"],
			Self::Current => &["current1", "current2", "total_current"],
			Self::Voltage => &["voltage"],
			Self::Energy => &["total_energy"],
		}
	}

	/// Extracts this group's channel values from a reading.
	///
	/// Absent readings become gaps, except the accumulated energy which is
	/// charted as 0 when missing.
	pub fn values(&self, snapshot: &Snapshot) -> Vec<Value> {
		match self {
			Self::Power => vec![snapshot.power1, snapshot.power2, snapshot.total_power],
			Self::Current => vec![
				snapshot.current1,
				snapshot.current2,
				snapshot.total_current,
			],
			Self::Voltage => vec![snapshot.voltage],
			Self::Energy => vec![Some(snapshot.total_energy.unwrap_or(0.0))],
		}
	}

	fn index(&self) -> usize {
		*self as usize
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesBuffer {
	capacity: usize,
	labels: VecDeque<String>,
	channels: Vec<VecDeque<Value>>,
}

impl SeriesBuffer {
	pub fn new(channel_count: usize, capacity: usize) -> Self {
		Self {
			capacity,
			labels: VecDeque::with_capacity(capacity + 1),
			channels: vec![VecDeque::with_capacity(capacity + 1); channel_count],
		}
	}

	/// Appends one entry to every channel, evicting the oldest entry once the
	/// buffer holds more than its capacity.
	///
	/// A value count that does not match the channel count leaves the buffer
	/// untouched.
	pub fn append(&mut self, label: impl Into<String>, values: &[Value]) -> Result<(), SeriesError> {
		self.check_count(values.len())?;

		self.labels.push_back(label.into());
		for (channel, value) in self.channels.iter_mut().zip(values) {
			channel.push_back(*value);
		}

		if self.labels.len() > self.capacity {
			self.labels.pop_front();
			for channel in self.channels.iter_mut() {
				channel.pop_front();
			}
		}

		Ok(())
	}

	/// Discards the contents and installs `entries` in order.
	///
	/// No capacity limit is applied; the caller bounds the number of entries.
	/// If any entry has the wrong value count the buffer is left untouched.
	pub fn replace_all<I>(&mut self, entries: I) -> Result<(), SeriesError>
	where
		I: IntoIterator<Item = (String, Vec<Value>)>,
	{
		let mut labels = VecDeque::new();
		let mut channels = vec![VecDeque::new(); self.channels.len()];

		for (label, values) in entries {
			self.check_count(values.len())?;
			labels.push_back(label);
			for (channel, value) in channels.iter_mut().zip(values) {
				channel.push_back(value);
			}
		}

		self.labels = labels;
		self.channels = channels;
		Ok(())
	}

	pub fn clear(&mut self) {
		self.labels.clear();
		for channel in self.channels.iter_mut() {
			channel.clear();
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.labels.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn channel_count(&self) -> usize {
		self.channels.len()
	}

	pub fn labels(&self) -> &VecDeque<String> {
		&self.labels
	}

	/// Returns the values of channel `index`.
	///
	/// # Panics
	/// Panics if `index` is not below [`SeriesBuffer::channel_count`].
	pub fn channel(&self, index: usize) -> &VecDeque<Value> {
		&self.channels[index]
	}

	fn check_count(&self, actual: usize) -> Result<(), SeriesError> {
		let expected = self.channels.len();
		if actual == expected {
			Ok(())
		} else {
			Err(SeriesError::ChannelCount { expected, actual })
		}
	}
}

/// The four chart buffers, updated together.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSet {
	buffers: [SeriesBuffer; 4],
}

impl SeriesSet {
	pub fn new(capacity: usize) -> Self {
		let buffer = |group: SeriesGroup| SeriesBuffer::new(group.channels().len(), capacity);
		Self {
			buffers: SeriesGroup::ALL.map(buffer),
		}
	}

	pub fn group(&self, group: SeriesGroup) -> &SeriesBuffer {
		&self.buffers[group.index()]
	}

	/// Appends a reading to every group under one label.
	pub fn append_snapshot(&mut self, label: &str, snapshot: &Snapshot) -> Result<(), SeriesError> {
		for group in SeriesGroup::ALL {
			self.buffers[group.index()].append(label, &group.values(snapshot))?;
		}
		Ok(())
	}

	/// Replaces every group with the given labelled readings, in order.
	pub fn replace_all(&mut self, rows: &[(String, Snapshot)]) -> Result<(), SeriesError> {
		for group in SeriesGroup::ALL {
			let entries = rows
				.iter()
				.map(|(label, snapshot)| (label.clone(), group.values(snapshot)));
			self.buffers[group.index()].replace_all(entries)?;
		}
		Ok(())
	}

	pub fn clear(&mut self) {
		for buffer in self.buffers.iter_mut() {
			buffer.clear();
		}
	}

	/// Number of points kept by live appends.
	pub fn capacity(&self) -> usize {
		self.buffers[0].capacity()
	}

	/// Number of points on the charts. Every group holds the same number.
	pub fn len(&self) -> usize {
		self.buffers[0].len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
