use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info};
use tokio::time::Instant;

use crate::domain::health_status::{HealthSnapshot, HealthStatus, ProcessorHealth};
use crate::domain::payment_processor::ProcessorId;

#[derive(Debug, Default)]
struct HealthTable {
	primary:   ProcessorHealth,
	secondary: ProcessorHealth,
}

impl HealthTable {
	fn get_mut(&mut self, id: ProcessorId) -> &mut ProcessorHealth {
		match id {
			ProcessorId::Primary => &mut self.primary,
			ProcessorId::Secondary => &mut self.secondary,
		}
	}

	fn get(&self, id: ProcessorId) -> &ProcessorHealth {
		match id {
			ProcessorId::Primary => &self.primary,
			ProcessorId::Secondary => &self.secondary,
		}
	}
}

/// Owner of the health table for both processors.
///
/// Every read and write goes through one mutex; updates are rare (one per
/// probe) so contention stays low even with many workers reading.
#[derive(Debug, Default)]
pub struct ProcessorHealthMonitor {
	table: Mutex<HealthTable>,
}

impl ProcessorHealthMonitor {
	pub fn new() -> Self {
		Self::default()
	}

	fn table(&self) -> MutexGuard<'_, HealthTable> {
		self.table.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn is_available(&self, id: ProcessorId) -> bool {
		self.table().get(id).is_available(Instant::now())
	}

	pub fn status(&self, id: ProcessorId) -> HealthStatus {
		self.table().get(id).status(Instant::now())
	}

	pub fn snapshot(&self) -> HealthSnapshot {
		let now = Instant::now();
		let table = self.table();
		HealthSnapshot {
			primary:   table.primary.status(now),
			secondary: table.secondary.status(now),
		}
	}

	pub fn mark_failing(&self, id: ProcessorId, duration: Duration) {
		self.table().get_mut(id).suppress(Instant::now(), duration);
		info!("{id} processor suppressed for {}ms", duration.as_millis());
	}

	pub fn mark_healthy(&self, id: ProcessorId) {
		self.table().get_mut(id).recover();
		debug!("{id} processor marked healthy");
	}

	/// Claims the next probe slot for `id`. Returns `false` when the processor
	/// is cooling down or was probed less than `min_interval` ago; otherwise
	/// stamps the probe time and returns `true`.
	pub fn begin_probe(&self, id: ProcessorId, min_interval: Duration) -> bool {
		let now = Instant::now();
		let mut table = self.table();
		let health = table.get_mut(id);
		if !health.should_probe(now, min_interval) {
			return false;
		}
		health.record_probe(now);
		true
	}
}
