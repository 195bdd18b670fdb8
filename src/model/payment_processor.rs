use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::payment::Payment;

#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentProcessorRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	#[serde(with = "rust_decimal::serde::float")]
	pub amount:         Decimal,
	#[serde(rename = "requestedAt", with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

impl From<&Payment> for PaymentProcessorRequest {
	fn from(payment: &Payment) -> Self {
		Self {
			correlation_id: payment.correlation_id,
			amount:         payment.amount,
			requested_at:   payment.requested_at,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheckResponse {
	pub failing:           bool,
	#[serde(rename = "minResponseTime")]
	pub min_response_time: u64,
}
