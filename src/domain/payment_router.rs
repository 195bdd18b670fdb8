use crate::domain::health_status::HealthSnapshot;
use crate::domain::payment_processor::{PaymentProcessor, ProcessorId};

/// Strict priority fallback: the primary whenever it is available, the
/// secondary only when the primary is not, nothing when both are suppressed.
pub fn select_processor(snapshot: &HealthSnapshot) -> Option<ProcessorId> {
	if snapshot.primary.is_healthy() {
		Some(ProcessorId::Primary)
	} else if snapshot.secondary.is_healthy() {
		Some(ProcessorId::Secondary)
	} else {
		None
	}
}

pub trait PaymentRouter: Send + Sync + 'static {
	fn get_processor_for_payment(&self) -> Option<PaymentProcessor>;
}
