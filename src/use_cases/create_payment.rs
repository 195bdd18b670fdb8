use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::{Display, Error};
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::payment::Payment;
use crate::domain::queue::{Message, Queue, QueueError};
use crate::use_cases::dto::CreatePaymentCommand;

/// What intake does with a valid payment that finds the queue full.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverloadPolicy {
	/// Acknowledge the caller and discard the payment.
	#[default]
	Drop,
	/// Surface the overload to the caller.
	Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
	Queued,
	Dropped,
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum CreatePaymentError {
	#[display("invalid payment: {_0}")]
	InvalidPayment(#[error(not(source))] String),
	#[display("payment queue is full")]
	Overloaded,
	#[display("payment queue is closed")]
	QueueClosed,
}

#[derive(Clone)]
pub struct CreatePaymentUseCase<Q: Queue<Payment>> {
	payment_queue:   Q,
	overload_policy: OverloadPolicy,
	dropped:         Arc<AtomicU64>,
}

impl<Q: Queue<Payment>> CreatePaymentUseCase<Q> {
	pub fn new(payment_queue: Q, overload_policy: OverloadPolicy) -> Self {
		Self {
			payment_queue,
			overload_policy,
			dropped: Arc::new(AtomicU64::new(0)),
		}
	}

	pub fn execute(
		&self,
		command: CreatePaymentCommand,
	) -> Result<Admission, CreatePaymentError> {
		validate(&command)?;

		let payment = Payment::new(command.correlation_id, command.amount);
		match self
			.payment_queue
			.push(Message::with(command.correlation_id, payment))
		{
			Ok(()) => Ok(Admission::Queued),
			Err(QueueError::Full) => {
				let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
				warn!(
					"Payment queue full, payment {} not admitted ({dropped} so far)",
					command.correlation_id
				);
				match self.overload_policy {
					OverloadPolicy::Drop => Ok(Admission::Dropped),
					OverloadPolicy::Reject => Err(CreatePaymentError::Overloaded),
				}
			}
			Err(QueueError::Closed) => Err(CreatePaymentError::QueueClosed),
		}
	}

	/// Payments turned away because the queue was full.
	pub fn dropped(&self) -> u64 {
		self.dropped.load(Ordering::Relaxed)
	}
}

fn validate(command: &CreatePaymentCommand) -> Result<(), CreatePaymentError> {
	if command.correlation_id.is_nil() {
		return Err(CreatePaymentError::InvalidPayment(
			"correlationId is required".to_string(),
		));
	}
	if command.amount <= Decimal::ZERO {
		return Err(CreatePaymentError::InvalidPayment(
			"amount must be greater than zero".to_string(),
		));
	}
	Ok(())
}
