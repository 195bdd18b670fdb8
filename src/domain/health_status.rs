use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
	Healthy,
	Suppressed,
}

impl HealthStatus {
	pub fn is_healthy(&self) -> bool {
		matches!(self, HealthStatus::Healthy)
	}
}

/// Liveness bookkeeping for a single processor.
///
/// Recovery is lazy: a processor is available again as soon as `now` reaches
/// `suppressed_until`, no timer has to fire for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorHealth {
	suppressed_until: Option<Instant>,
	last_probe_at:    Option<Instant>,
}

impl ProcessorHealth {
	pub fn is_available(&self, now: Instant) -> bool {
		self.suppressed_until.is_none_or(|until| now >= until)
	}

	pub fn status(&self, now: Instant) -> HealthStatus {
		if self.is_available(now) {
			HealthStatus::Healthy
		} else {
			HealthStatus::Suppressed
		}
	}

	pub fn suppressed_until(&self) -> Option<Instant> {
		self.suppressed_until
	}

	pub fn last_probe_at(&self) -> Option<Instant> {
		self.last_probe_at
	}

	/// Extends suppression to `now + duration`. An existing, later deadline
	/// is kept.
	pub fn suppress(&mut self, now: Instant, duration: Duration) {
		let until = now + duration;
		self.suppressed_until = Some(match self.suppressed_until {
			Some(current) if current > until => current,
			_ => until,
		});
	}

	pub fn recover(&mut self) {
		self.suppressed_until = None;
	}

	/// A probe is due when the processor is not cooling down and was not
	/// probed within `min_interval`.
	pub fn should_probe(&self, now: Instant, min_interval: Duration) -> bool {
		self.is_available(now) &&
			self.last_probe_at
				.is_none_or(|last| now.duration_since(last) >= min_interval)
	}

	pub fn record_probe(&mut self, now: Instant) {
		self.last_probe_at = Some(now);
	}
}

/// Point-in-time view of both processors, as consumed by the dispatch policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSnapshot {
	pub primary:   HealthStatus,
	pub secondary: HealthStatus,
}
