use derive_more::{Display, Error};
use rust_decimal::{Decimal, RoundingStrategy};
use time::OffsetDateTime;

use crate::domain::payment::DispatchOutcome;
use crate::domain::payment_processor::ProcessorId;
use crate::domain::repository::{PaymentRepository, RepositoryError};
use crate::use_cases::dto::{
	GetPaymentSummaryQuery, PaymentSummaryResult, PaymentsSummaryResponse,
};

#[derive(Debug, Display, Error)]
pub enum SummaryError {
	#[display("'from' ({from}) must not be after 'to' ({to})")]
	InvalidRange {
		from: OffsetDateTime,
		to:   OffsetDateTime,
	},
	#[display("could not read payment outcomes: {_0}")]
	Storage(RepositoryError),
	#[display("total amount for the {_0} processor does not fit a decimal")]
	AmountOverflow(#[error(not(source))] ProcessorId),
}

#[derive(Default)]
struct Bucket {
	count: u64,
	sum:   Decimal,
}

impl Bucket {
	fn add(&mut self, outcome: &DispatchOutcome) -> Result<(), SummaryError> {
		self.sum = self
			.sum
			.checked_add(outcome.amount)
			.ok_or(SummaryError::AmountOverflow(outcome.processed_by))?;
		self.count += 1;
		Ok(())
	}

	fn finish(self) -> PaymentSummaryResult {
		PaymentSummaryResult {
			total_requests: self.count,
			total_amount:   self
				.sum
				.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
		}
	}
}

/// Partitions outcomes by processor. Amounts are summed exactly and rounded
/// once per bucket; a sum beyond the decimal range is an error.
pub fn summarize<'a>(
	outcomes: impl IntoIterator<Item = &'a DispatchOutcome>,
) -> Result<PaymentsSummaryResponse, SummaryError> {
	let mut default = Bucket::default();
	let mut fallback = Bucket::default();
	for outcome in outcomes {
		match outcome.processed_by {
			ProcessorId::Primary => default.add(outcome)?,
			ProcessorId::Secondary => fallback.add(outcome)?,
		}
	}

	Ok(PaymentsSummaryResponse {
		default:  default.finish(),
		fallback: fallback.finish(),
	})
}

#[derive(Clone)]
pub struct GetPaymentSummaryUseCase<R: PaymentRepository> {
	payment_repo: R,
}

impl<R: PaymentRepository> GetPaymentSummaryUseCase<R> {
	pub fn new(payment_repo: R) -> Self {
		Self { payment_repo }
	}

	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummaryResponse, SummaryError> {
		if let (Some(from), Some(to)) = (query.from, query.to) &&
			from > to
		{
			return Err(SummaryError::InvalidRange { from, to });
		}

		let outcomes = self
			.payment_repo
			.scan_range(query.from, query.to)
			.await
			.map_err(SummaryError::Storage)?;

		summarize(&outcomes)
	}
}
