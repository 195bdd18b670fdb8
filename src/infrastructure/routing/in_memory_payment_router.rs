use std::sync::Arc;

use crate::domain::payment_processor::{PaymentProcessor, PaymentProcessors};
use crate::domain::payment_router::{PaymentRouter, select_processor};
use crate::infrastructure::routing::processor_health_monitor::ProcessorHealthMonitor;

#[derive(Clone)]
pub struct InMemoryPaymentRouter {
	pub processors: PaymentProcessors,
	pub monitor:    Arc<ProcessorHealthMonitor>,
}

impl InMemoryPaymentRouter {
	pub fn new(
		processors: PaymentProcessors,
		monitor: Arc<ProcessorHealthMonitor>,
	) -> Self {
		Self {
			processors,
			monitor,
		}
	}
}

impl PaymentRouter for InMemoryPaymentRouter {
	fn get_processor_for_payment(&self) -> Option<PaymentProcessor> {
		let snapshot = self.monitor.snapshot();
		select_processor(&snapshot).map(|id| self.processors.get(id).clone())
	}
}
