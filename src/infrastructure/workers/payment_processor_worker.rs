use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::domain::payment::Payment;
use crate::domain::payment_router::PaymentRouter;
use crate::domain::queue::Queue;
use crate::domain::repository::PaymentRepository;
use crate::use_cases::process_payment::ProcessPaymentUseCase;

/// Drains the queue until it is closed. Each payment gets exactly one
/// dispatch attempt; failures are logged and the payment is not re-queued.
pub async fn payment_processing_worker<Q, R, P>(
	worker_id: usize,
	queue: Q,
	process_payment_use_case: Arc<ProcessPaymentUseCase<R, P>>,
) where
	Q: Queue<Payment>,
	R: PaymentRepository,
	P: PaymentRouter,
{
	debug!("Payment worker {worker_id} started");

	while let Some(message) = queue.pop().await {
		let message_id = message.id;
		match process_payment_use_case.execute(message.body).await {
			Ok(processor) => {
				debug!("Worker {worker_id} dispatched '{message_id}' to {processor}");
			}
			Err(e) => {
				warn!("Worker {worker_id} could not dispatch '{message_id}': {e}");
			}
		}
	}

	debug!("Payment worker {worker_id} stopped");
}

/// Fixed set of workers consuming the payment queue.
pub struct PaymentWorkerPool<Q, R, P>
where
	Q: Queue<Payment> + Clone,
	R: PaymentRepository,
	P: PaymentRouter,
{
	queue:    Q,
	use_case: Arc<ProcessPaymentUseCase<R, P>>,
	handles:  Mutex<Vec<JoinHandle<()>>>,
}

impl<Q, R, P> PaymentWorkerPool<Q, R, P>
where
	Q: Queue<Payment> + Clone,
	R: PaymentRepository,
	P: PaymentRouter,
{
	pub fn new(queue: Q, use_case: ProcessPaymentUseCase<R, P>) -> Self {
		Self {
			queue,
			use_case: Arc::new(use_case),
			handles:  Mutex::new(Vec::new()),
		}
	}

	/// Spawns `pool_size` workers, at least one.
	pub fn start(&self, pool_size: usize) {
		let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
		let first = handles.len();
		for worker_id in first..first + pool_size.max(1) {
			handles.push(tokio::spawn(payment_processing_worker(
				worker_id,
				self.queue.clone(),
				Arc::clone(&self.use_case),
			)));
		}
		info!("Started {} payment workers", handles.len());
	}

	pub fn size(&self) -> usize {
		self.handles.lock().unwrap_or_else(PoisonError::into_inner).len()
	}

	pub fn use_case(&self) -> &ProcessPaymentUseCase<R, P> {
		&self.use_case
	}

	/// Closes the queue and waits for every worker to finish its in-flight
	/// payment. Payments still buffered are discarded. Calling it again is a
	/// no-op.
	pub async fn stop(&self) {
		self.queue.close();

		let handles: Vec<_> = self
			.handles
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.drain(..)
			.collect();
		if handles.is_empty() {
			return;
		}

		let discarded = self.queue.len();
		for handle in handles {
			if let Err(e) = handle.await {
				warn!("Payment worker ended abnormally: {e}");
			}
		}

		let stats = self.use_case.stats();
		info!(
			"Payment workers stopped: {} processed, {} failed, {discarded} discarded",
			stats.processed(),
			stats.failed()
		);
	}
}
