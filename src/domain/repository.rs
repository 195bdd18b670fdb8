use std::sync::Arc;

use async_trait::async_trait;
use derive_more::{Display, Error};
use time::OffsetDateTime;

use crate::domain::payment::DispatchOutcome;

#[derive(Debug, Display, Error)]
pub enum RepositoryError {
	#[display("outcome store unavailable: {_0}")]
	Unavailable(#[error(not(source))] String),
	#[display("outcome could not be encoded: {_0}")]
	Encoding(#[error(not(source))] String),
}

/// Append-only, time-indexed store of successful dispatches.
#[async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
	async fn save(&self, outcome: DispatchOutcome) -> Result<(), RepositoryError>;

	/// Returns every outcome whose `requested_at` lies in `[from, to)`,
	/// ordered by `requested_at`. A missing bound is open.
	async fn scan_range(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Vec<DispatchOutcome>, RepositoryError>;

	async fn clear(&self) -> Result<(), RepositoryError>;
}

pub type SharedPaymentRepository = Arc<dyn PaymentRepository>;

#[async_trait]
impl<R: PaymentRepository + ?Sized> PaymentRepository for Arc<R> {
	async fn save(&self, outcome: DispatchOutcome) -> Result<(), RepositoryError> {
		(**self).save(outcome).await
	}

	async fn scan_range(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Vec<DispatchOutcome>, RepositoryError> {
		(**self).scan_range(from, to).await
	}

	async fn clear(&self) -> Result<(), RepositoryError> {
		(**self).clear().await
	}
}

/// Half-open window membership shared by the store adapters.
pub fn in_window(
	requested_at: OffsetDateTime,
	from: Option<OffsetDateTime>,
	to: Option<OffsetDateTime>,
) -> bool {
	from.is_none_or(|from| requested_at >= from) &&
		to.is_none_or(|to| requested_at < to)
}
