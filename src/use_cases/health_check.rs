use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;

use crate::domain::health_status::HealthStatus;
use crate::domain::payment_processor::{PaymentProcessor, PaymentProcessors};
use crate::infrastructure::routing::processor_health_monitor::ProcessorHealthMonitor;
use crate::model::payment_processor::HealthCheckResponse;

#[derive(Debug, Clone, Copy)]
pub struct HealthCheckSettings {
	/// Minimum time between two probes of the same processor.
	pub min_probe_interval: Duration,
	pub probe_timeout:      Duration,
	/// Suppression applied when a probe reports failure.
	pub failure_cooldown:   Duration,
	/// Probes allowed in flight at once.
	pub max_concurrent:     usize,
}

impl Default for HealthCheckSettings {
	fn default() -> Self {
		Self {
			min_probe_interval: Duration::from_secs(5),
			probe_timeout:      Duration::from_secs(2),
			failure_cooldown:   Duration::from_secs(10),
			max_concurrent:     2,
		}
	}
}

#[derive(Clone)]
pub struct HealthCheckUseCase {
	monitor:     Arc<ProcessorHealthMonitor>,
	processors:  PaymentProcessors,
	http_client: Client,
	settings:    HealthCheckSettings,
	probe_slots: Arc<Semaphore>,
}

impl HealthCheckUseCase {
	pub fn new(
		monitor: Arc<ProcessorHealthMonitor>,
		processors: PaymentProcessors,
		http_client: Client,
		settings: HealthCheckSettings,
	) -> Self {
		Self {
			monitor,
			processors,
			http_client,
			probe_slots: Arc::new(Semaphore::new(settings.max_concurrent.max(1))),
			settings,
		}
	}

	pub fn monitor(&self) -> &Arc<ProcessorHealthMonitor> {
		&self.monitor
	}

	/// Schedules a probe for every processor that is due one and returns
	/// without waiting for any of them.
	pub fn check_health(&self) {
		for processor in self.processors.iter() {
			let Ok(permit) = Arc::clone(&self.probe_slots).try_acquire_owned() else {
				debug!("Probe executor busy, skipping {} health check", processor.id);
				continue;
			};
			if !self
				.monitor
				.begin_probe(processor.id, self.settings.min_probe_interval)
			{
				continue;
			}

			let this = self.clone();
			let processor = processor.clone();
			tokio::spawn(async move {
				this.probe(&processor).await;
				drop(permit);
			});
		}
	}

	/// Queries the processor's health endpoint and applies the result.
	pub async fn probe(&self, processor: &PaymentProcessor) -> HealthStatus {
		let cooldown = self.settings.failure_cooldown;
		let response = self
			.http_client
			.get(processor.service_health_url())
			.timeout(self.settings.probe_timeout)
			.send()
			.await;

		match response {
			Ok(resp) if resp.status().is_success() => {
				match resp.json::<HealthCheckResponse>().await {
					Ok(health) if health.failing => {
						let hint = Duration::from_millis(health.min_response_time);
						warn!(
							"{} processor reports failing (minResponseTime={}ms)",
							processor.id, health.min_response_time
						);
						self.monitor.mark_failing(processor.id, cooldown.max(hint));
					}
					Ok(health) => {
						info!(
							"{} processor healthy (minResponseTime={}ms)",
							processor.id, health.min_response_time
						);
						self.monitor.mark_healthy(processor.id);
					}
					Err(e) => {
						error!(
							"Failed to parse {} health check response: {e}",
							processor.id
						);
						self.monitor.mark_failing(processor.id, cooldown);
					}
				}
			}
			Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
				warn!("{} health check rate limited", processor.id);
			}
			Ok(resp) => {
				error!(
					"{} processor health check failed with status: {}",
					processor.id,
					resp.status()
				);
				self.monitor.mark_failing(processor.id, cooldown);
			}
			Err(e) => {
				error!("Failed to reach {} payment processor: {e}", processor.id);
				self.monitor.mark_failing(processor.id, cooldown);
			}
		}

		self.monitor.status(processor.id)
	}
}
