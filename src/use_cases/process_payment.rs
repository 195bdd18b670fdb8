use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use derive_more::{Display, Error};
use log::{debug, error};
use reqwest::{Client, StatusCode};

use crate::domain::payment::Payment;
use crate::domain::payment_processor::ProcessorId;
use crate::domain::payment_router::PaymentRouter;
use crate::domain::repository::{PaymentRepository, RepositoryError};
use crate::model::payment_processor::PaymentProcessorRequest;
use crate::use_cases::health_check::HealthCheckUseCase;

#[derive(Debug, Display, Error)]
pub enum PaymentProcessingError {
	#[display("no payment processor is available")]
	NoProcessorAvailable,
	#[display("{processor} processor answered with status {status}")]
	Rejected {
		processor: ProcessorId,
		status:    u16,
	},
	#[display("{processor} processor could not be reached: {message}")]
	Transport {
		processor: ProcessorId,
		message:   String,
	},
	#[display("payment accepted by {processor} processor but not recorded: {source}")]
	Persistence {
		processor: ProcessorId,
		source:    RepositoryError,
	},
}

#[derive(Debug, Default)]
pub struct DispatchStats {
	processed: AtomicU64,
	failed:    AtomicU64,
}

impl DispatchStats {
	pub fn processed(&self) -> u64 {
		self.processed.load(Ordering::Relaxed)
	}

	pub fn failed(&self) -> u64 {
		self.failed.load(Ordering::Relaxed)
	}
}

#[derive(Clone)]
pub struct ProcessPaymentUseCase<R: PaymentRepository, P: PaymentRouter> {
	payment_repo:     R,
	router:           P,
	health_check:     HealthCheckUseCase,
	http_client:      Client,
	dispatch_timeout: Duration,
	stats:            Arc<DispatchStats>,
}

impl<R: PaymentRepository, P: PaymentRouter> ProcessPaymentUseCase<R, P> {
	pub fn new(
		payment_repo: R,
		router: P,
		health_check: HealthCheckUseCase,
		http_client: Client,
		dispatch_timeout: Duration,
	) -> Self {
		Self {
			payment_repo,
			router,
			health_check,
			http_client,
			dispatch_timeout,
			stats: Arc::new(DispatchStats::default()),
		}
	}

	pub fn stats(&self) -> &DispatchStats {
		&self.stats
	}

	/// Makes a single dispatch attempt. A failed call is not retried and not
	/// redirected to the other processor; routing only changes once a probe
	/// suppresses the failing processor.
	pub async fn execute(
		&self,
		payment: Payment,
	) -> Result<ProcessorId, PaymentProcessingError> {
		let result = self.dispatch(payment).await;
		match &result {
			Ok(_) => self.stats.processed.fetch_add(1, Ordering::Relaxed),
			Err(_) => self.stats.failed.fetch_add(1, Ordering::Relaxed),
		};
		result
	}

	async fn dispatch(
		&self,
		payment: Payment,
	) -> Result<ProcessorId, PaymentProcessingError> {
		self.health_check.check_health();

		let processor = self
			.router
			.get_processor_for_payment()
			.ok_or(PaymentProcessingError::NoProcessorAvailable)?;

		let response = self
			.http_client
			.post(processor.payments_url())
			.timeout(self.dispatch_timeout)
			.json(&PaymentProcessorRequest::from(&payment))
			.send()
			.await
			.map_err(|e| PaymentProcessingError::Transport {
				processor: processor.id,
				message:   e.to_string(),
			})?;

		if response.status() != StatusCode::OK {
			return Err(PaymentProcessingError::Rejected {
				processor: processor.id,
				status:    response.status().as_u16(),
			});
		}

		debug!(
			"Payment {} processed by {} processor",
			payment.correlation_id, processor.id
		);

		self.payment_repo
			.save(payment.processed_by(processor.id))
			.await
			.map_err(|source| {
				error!("Failed to record processed payment: {source}");
				PaymentProcessingError::Persistence {
					processor: processor.id,
					source,
				}
			})?;

		Ok(processor.id)
	}
}
