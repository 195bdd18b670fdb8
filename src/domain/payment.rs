use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::payment_processor::ProcessorId;

/// A payment accepted at intake, waiting to be dispatched.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Payment {
	pub correlation_id: Uuid,
	pub amount:         Decimal,
	#[serde(with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

impl Payment {
	pub fn new(correlation_id: Uuid, amount: Decimal) -> Self {
		Self {
			correlation_id,
			amount,
			requested_at: OffsetDateTime::now_utc(),
		}
	}

	pub fn processed_by(self, processor: ProcessorId) -> DispatchOutcome {
		DispatchOutcome {
			correlation_id: self.correlation_id,
			amount:         self.amount,
			requested_at:   self.requested_at,
			processed_by:   processor,
		}
	}
}

/// Record of a payment the downstream processor accepted. Appended once and
/// never mutated; `requested_at` is the ordering key of the outcome store.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DispatchOutcome {
	pub correlation_id: Uuid,
	pub amount:         Decimal,
	#[serde(with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
	pub processed_by:   ProcessorId,
}
