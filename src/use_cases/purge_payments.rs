use crate::domain::repository::{PaymentRepository, RepositoryError};

#[derive(Clone)]
pub struct PurgePaymentsUseCase<R: PaymentRepository> {
	repository: R,
}

impl<R: PaymentRepository> PurgePaymentsUseCase<R> {
	pub fn new(repository: R) -> Self {
		Self { repository }
	}

	pub async fn execute(&self) -> Result<(), RepositoryError> {
		self.repository.clear().await
	}
}
