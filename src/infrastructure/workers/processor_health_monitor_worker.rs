use std::time::Duration;

use log::info;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use crate::use_cases::health_check::HealthCheckUseCase;

/// Keeps the health table fresh while the dispatch path is idle. Probes it
/// schedules are subject to the same rate limit as the on-demand ones.
pub async fn processor_health_monitor_worker(
	health_check: HealthCheckUseCase,
	period: Duration,
	mut shutdown: watch::Receiver<bool>,
) {
	let mut ticker = interval(period.max(Duration::from_millis(1)));
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		tokio::select! {
			_ = ticker.tick() => health_check.check_health(),
			changed = shutdown.changed() => {
				if changed.is_err() || *shutdown.borrow() {
					break;
				}
			}
		}
	}

	info!("Processor health monitor stopped");
}
