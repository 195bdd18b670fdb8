use actix_web::{HttpResponse, get, web};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PaymentsSummaryFilter;
use crate::domain::repository::SharedPaymentRepository;
use crate::use_cases::dto::GetPaymentSummaryQuery;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;

#[get("/payments-summary")]
pub async fn payments_summary(
	filter: web::Query<PaymentsSummaryFilter>,
	get_payment_summary_use_case: web::Data<
		GetPaymentSummaryUseCase<SharedPaymentRepository>,
	>,
) -> Result<HttpResponse, ApiError> {
	let query = GetPaymentSummaryQuery {
		from: filter.from,
		to:   filter.to,
	};

	let summary = get_payment_summary_use_case.execute(query).await?;
	Ok(HttpResponse::Ok().json(summary))
}
