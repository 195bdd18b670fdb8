use async_trait::async_trait;
use log::{debug, warn};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use time::OffsetDateTime;

use crate::domain::payment::DispatchOutcome;
use crate::domain::repository::{PaymentRepository, RepositoryError, in_window};
use crate::infrastructure::config::redis::PROCESSED_PAYMENTS_SET_KEY;

/// Outcome store on a Redis sorted set.
///
/// Each member is the JSON-encoded outcome; its score is `requested_at` in
/// unix milliseconds. Scores only narrow the scan, the exact half-open window
/// is applied after decoding.
#[derive(Clone)]
pub struct RedisPaymentRepository {
	client: Client,
}

impl RedisPaymentRepository {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(&self) -> Result<MultiplexedConnection, RepositoryError> {
		self.client
			.get_multiplexed_async_connection()
			.await
			.map_err(|e| RepositoryError::Unavailable(e.to_string()))
	}
}

fn unix_millis(dt: OffsetDateTime) -> i64 {
	dt.unix_timestamp_nanos().div_euclid(1_000_000) as i64
}

fn score_bounds(
	from: Option<OffsetDateTime>,
	to: Option<OffsetDateTime>,
) -> (String, String) {
	let min = from.map_or_else(|| "-inf".to_string(), |dt| unix_millis(dt).to_string());
	let max = to.map_or_else(|| "+inf".to_string(), |dt| unix_millis(dt).to_string());
	(min, max)
}

#[async_trait]
impl PaymentRepository for RedisPaymentRepository {
	async fn save(&self, outcome: DispatchOutcome) -> Result<(), RepositoryError> {
		let member = serde_json::to_string(&outcome)
			.map_err(|e| RepositoryError::Encoding(e.to_string()))?;
		let score = unix_millis(outcome.requested_at);

		let mut con = self.connection().await?;
		let _: () = con
			.zadd(PROCESSED_PAYMENTS_SET_KEY, member, score)
			.await
			.map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

		debug!("Stored outcome for payment {}", outcome.correlation_id);
		Ok(())
	}

	async fn scan_range(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Vec<DispatchOutcome>, RepositoryError> {
		let (min, max) = score_bounds(from, to);

		let mut con = self.connection().await?;
		let members: Vec<String> = con
			.zrangebyscore(PROCESSED_PAYMENTS_SET_KEY, min, max)
			.await
			.map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

		let outcomes = members
			.iter()
			.filter_map(|member| match serde_json::from_str::<DispatchOutcome>(member) {
				Ok(outcome) => Some(outcome),
				Err(e) => {
					warn!("Skipping undecodable stored outcome: {e}");
					None
				}
			})
			.filter(|outcome| in_window(outcome.requested_at, from, to))
			.collect();

		Ok(outcomes)
	}

	async fn clear(&self) -> Result<(), RepositoryError> {
		let mut con = self.connection().await?;
		let _: () = con
			.del(PROCESSED_PAYMENTS_SET_KEY)
			.await
			.map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
		Ok(())
	}
}
