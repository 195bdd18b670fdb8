use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::payment::DispatchOutcome;
use crate::domain::repository::{PaymentRepository, RepositoryError};

type OutcomeKey = (OffsetDateTime, u64);

/// Outcome store held in process memory.
///
/// Keys pair `requested_at` with an insertion sequence so that outcomes sharing
/// a timestamp are all kept.
#[derive(Default, Clone)]
pub struct InMemoryPaymentRepository {
	outcomes: Arc<RwLock<BTreeMap<OutcomeKey, DispatchOutcome>>>,
	sequence: Arc<AtomicU64>,
}

impl InMemoryPaymentRepository {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn len(&self) -> usize {
		self.outcomes.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.outcomes.read().await.is_empty()
	}
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
	async fn save(&self, outcome: DispatchOutcome) -> Result<(), RepositoryError> {
		let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
		let mut outcomes = self.outcomes.write().await;
		outcomes.insert((outcome.requested_at, sequence), outcome);
		Ok(())
	}

	async fn scan_range(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Vec<DispatchOutcome>, RepositoryError> {
		if let (Some(from), Some(to)) = (from, to) &&
			from >= to
		{
			return Ok(Vec::new());
		}
		let lower = from.map_or(Bound::Unbounded, |from| Bound::Included((from, 0)));
		let upper = to.map_or(Bound::Unbounded, |to| Bound::Excluded((to, 0)));

		let outcomes = self.outcomes.read().await;
		Ok(outcomes.range((lower, upper)).map(|(_, o)| o.clone()).collect())
	}

	async fn clear(&self) -> Result<(), RepositoryError> {
		self.outcomes.write().await.clear();
		Ok(())
	}
}
