use actix_web::{HttpResponse, post, web};
use log::debug;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PaymentRequest;
use crate::infrastructure::queue::in_memory_payment_queue::PaymentQueue;
use crate::use_cases::create_payment::{Admission, CreatePaymentUseCase};
use crate::use_cases::dto::CreatePaymentCommand;

#[post("/payments")]
pub async fn payments(
	payload: web::Json<PaymentRequest>,
	create_payment_use_case: web::Data<CreatePaymentUseCase<PaymentQueue>>,
) -> Result<HttpResponse, ApiError> {
	let command = CreatePaymentCommand {
		correlation_id: payload.correlation_id,
		amount:         payload.amount,
	};

	match create_payment_use_case.execute(command)? {
		Admission::Queued => {
			debug!("Payment received and queued: {}", payload.correlation_id);
		}
		Admission::Dropped => {
			debug!("Payment acknowledged but dropped: {}", payload.correlation_id);
		}
	}

	Ok(HttpResponse::NoContent().finish())
}
