use actix_web::{HttpResponse, post, web};
use log::info;

use crate::adapters::web::errors::ApiError;
use crate::domain::repository::SharedPaymentRepository;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

#[post("/purge-payments")]
pub async fn payments_purge(
	purge_use_case: web::Data<PurgePaymentsUseCase<SharedPaymentRepository>>,
) -> Result<HttpResponse, ApiError> {
	info!("Received request to purge payments");
	purge_use_case.execute().await?;
	info!("Payments purged successfully");
	Ok(HttpResponse::Ok().body("Payments purged successfully"))
}
