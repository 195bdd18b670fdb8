use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use payment_dispatcher::adapters::web::handlers::{payments_purge, payments_summary};
use payment_dispatcher::domain::payment::DispatchOutcome;
use payment_dispatcher::domain::payment_processor::ProcessorId;
use payment_dispatcher::domain::repository::{
	PaymentRepository, RepositoryError, SharedPaymentRepository,
};
use payment_dispatcher::infrastructure::persistence::in_memory_payment_repository::InMemoryPaymentRepository;
use payment_dispatcher::use_cases::dto::PaymentsSummaryResponse;
use payment_dispatcher::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use payment_dispatcher::use_cases::purge_payments::PurgePaymentsUseCase;
use rust_decimal_macros::dec;
use time::OffsetDateTime;
use uuid::Uuid;

struct UnavailableRepository;

#[async_trait]
impl PaymentRepository for UnavailableRepository {
	async fn save(&self, _: DispatchOutcome) -> Result<(), RepositoryError> {
		Err(RepositoryError::Unavailable("connection refused".to_string()))
	}

	async fn scan_range(
		&self,
		_: Option<OffsetDateTime>,
		_: Option<OffsetDateTime>,
	) -> Result<Vec<DispatchOutcome>, RepositoryError> {
		Err(RepositoryError::Unavailable("connection refused".to_string()))
	}

	async fn clear(&self) -> Result<(), RepositoryError> {
		Err(RepositoryError::Unavailable("connection refused".to_string()))
	}
}

#[actix_web::test]
async fn test_payments_purge_clears_recorded_outcomes() {
	let repo = InMemoryPaymentRepository::new();
	for processed_by in ProcessorId::ALL {
		repo.save(DispatchOutcome {
			correlation_id: Uuid::new_v4(),
			amount:         dec!(12.34),
			requested_at:   OffsetDateTime::now_utc(),
			processed_by,
		})
		.await
		.unwrap();
	}
	let shared: SharedPaymentRepository = Arc::new(repo.clone());

	let app = test::init_service(
		App::new()
			.app_data(web::Data::new(PurgePaymentsUseCase::new(Arc::clone(&shared))))
			.app_data(web::Data::new(GetPaymentSummaryUseCase::new(shared)))
			.service(payments_purge)
			.service(payments_summary),
	)
	.await;

	let req = test::TestRequest::post().uri("/purge-payments").to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert!(repo.is_empty().await);

	let req = test::TestRequest::get().uri("/payments-summary").to_request();
	let summary: PaymentsSummaryResponse = test::call_and_read_body_json(&app, req).await;
	assert_eq!(summary, PaymentsSummaryResponse::default());
}

#[actix_web::test]
async fn test_payments_purge_store_failure_is_server_error() {
	let shared: SharedPaymentRepository = Arc::new(UnavailableRepository);
	let app = test::init_service(
		App::new()
			.app_data(web::Data::new(PurgePaymentsUseCase::new(shared)))
			.service(payments_purge),
	)
	.await;

	let req = test::TestRequest::post().uri("/purge-payments").to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
