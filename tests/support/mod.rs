#![allow(dead_code)]

pub mod fake_payment_processor;
pub mod redis_container;

use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Polls `condition` until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
	let deadline = Instant::now() + timeout;
	while Instant::now() < deadline {
		if condition() {
			return true;
		}
		sleep(Duration::from_millis(10)).await;
	}
	condition()
}
