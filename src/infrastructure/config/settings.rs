use std::time::Duration;

use serde::Deserialize;

use crate::use_cases::create_payment::OverloadPolicy;
use crate::use_cases::health_check::HealthCheckSettings;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
	pub server_host: String,
	pub server_port: u16,
	pub server_keepalive: u64,
	/// Outcomes are kept in memory when unset.
	pub redis_url: Option<String>,
	pub default_payment_processor_url: String,
	pub fallback_payment_processor_url: String,
	pub queue_capacity: usize,
	pub worker_count: usize,
	pub overload_policy: OverloadPolicy,
	pub dispatch_timeout_ms: u64,
	pub health_check_interval_ms: u64,
	pub health_check_timeout_ms: u64,
	pub failure_cooldown_ms: u64,
	pub probe_concurrency: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			server_host: "0.0.0.0".to_string(),
			server_port: 9999,
			server_keepalive: 75,
			redis_url: None,
			default_payment_processor_url: "http://payment-processor-default:8080"
				.to_string(),
			fallback_payment_processor_url: "http://payment-processor-fallback:8080"
				.to_string(),
			queue_capacity: 10_000,
			worker_count: 16,
			overload_policy: OverloadPolicy::Drop,
			dispatch_timeout_ms: 10_000,
			health_check_interval_ms: 5_000,
			health_check_timeout_ms: 2_000,
			failure_cooldown_ms: 10_000,
			probe_concurrency: 2,
		}
	}
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn dispatch_timeout(&self) -> Duration {
		Duration::from_millis(self.dispatch_timeout_ms)
	}

	pub fn health_check_interval(&self) -> Duration {
		Duration::from_millis(self.health_check_interval_ms)
	}

	pub fn health_check_settings(&self) -> HealthCheckSettings {
		HealthCheckSettings {
			min_probe_interval: self.health_check_interval(),
			probe_timeout:      Duration::from_millis(self.health_check_timeout_ms),
			failure_cooldown:   Duration::from_millis(self.failure_cooldown_ms),
			max_concurrent:     self.probe_concurrency,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::env;
	use std::sync::Mutex;

	use super::*;

	// Tests in this module mutate process-wide environment variables.
	static ENV_LOCK: Mutex<()> = Mutex::new(());

	#[test]
	fn test_config_load() {
		let _guard = ENV_LOCK.lock().unwrap();
		unsafe {
			env::set_var("APP_REDIS_URL", "redis://test_redis/");
			env::set_var(
				"APP_DEFAULT_PAYMENT_PROCESSOR_URL",
				"http://test_default/",
			);
			env::set_var(
				"APP_FALLBACK_PAYMENT_PROCESSOR_URL",
				"http://test_fallback/",
			);
			env::set_var("APP_SERVER_KEEPALIVE", "120");
			env::set_var("APP_QUEUE_CAPACITY", "500");
			env::set_var("APP_WORKER_COUNT", "4");
			env::set_var("APP_OVERLOAD_POLICY", "reject");
			env::set_var("APP_FAILURE_COOLDOWN_MS", "2500");
		};

		let config = Config::load().expect("Failed to load config in test");

		assert_eq!(config.redis_url, Some("redis://test_redis/".to_string()));
		assert_eq!(config.default_payment_processor_url, "http://test_default/");
		assert_eq!(
			config.fallback_payment_processor_url,
			"http://test_fallback/"
		);
		assert_eq!(config.server_keepalive, 120);
		assert_eq!(config.queue_capacity, 500);
		assert_eq!(config.worker_count, 4);
		assert_eq!(config.overload_policy, OverloadPolicy::Reject);
		assert_eq!(
			config.health_check_settings().failure_cooldown,
			Duration::from_millis(2500)
		);

		unsafe {
			env::remove_var("APP_REDIS_URL");
			env::remove_var("APP_DEFAULT_PAYMENT_PROCESSOR_URL");
			env::remove_var("APP_FALLBACK_PAYMENT_PROCESSOR_URL");
			env::remove_var("APP_SERVER_KEEPALIVE");
			env::remove_var("APP_QUEUE_CAPACITY");
			env::remove_var("APP_WORKER_COUNT");
			env::remove_var("APP_OVERLOAD_POLICY");
			env::remove_var("APP_FAILURE_COOLDOWN_MS");
		}
	}

	#[test]
	fn test_config_load_defaults() {
		let _guard = ENV_LOCK.lock().unwrap();

		let config = Config::load().expect("Failed to load config in test");

		assert_eq!(config, Config::default());
		assert_eq!(config.queue_capacity, 10_000);
		assert_eq!(config.redis_url, None);
		assert_eq!(config.dispatch_timeout(), Duration::from_secs(10));
		assert_eq!(config.health_check_interval(), Duration::from_secs(5));
	}
}
