use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, web};
use derive_more::derive::{Display, Error};
use log::{error, warn};
use serde::Serialize;

use crate::domain::repository::RepositoryError;
use crate::use_cases::create_payment::CreatePaymentError;
use crate::use_cases::get_payment_summary::SummaryError;

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("Request data is invalid: {_0}")]
	BadClientDataError(#[error(not(source))] String),
	#[display("Payments are not being accepted right now.")]
	ServiceUnavailableError,
	#[display("Could not access payment records.")]
	StorageError,
	#[display("Internal server error.")]
	InternalServerError,
}

impl ApiError {
	pub fn name(&self) -> String {
		match self {
			ApiError::BadClientDataError(_) => "Bad request".to_string(),
			ApiError::ServiceUnavailableError => "Service Unavailable".to_string(),
			ApiError::StorageError => "Internal Server Error".to_string(),
			ApiError::InternalServerError => "Internal Server Error".to_string(),
		}
	}
}

impl ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadClientDataError(_) => StatusCode::BAD_REQUEST,
			ApiError::ServiceUnavailableError => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
			ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<CreatePaymentError> for ApiError {
	fn from(e: CreatePaymentError) -> Self {
		match e {
			CreatePaymentError::InvalidPayment(reason) => {
				ApiError::BadClientDataError(reason)
			}
			CreatePaymentError::Overloaded | CreatePaymentError::QueueClosed => {
				ApiError::ServiceUnavailableError
			}
		}
	}
}

impl From<SummaryError> for ApiError {
	fn from(e: SummaryError) -> Self {
		match e {
			SummaryError::InvalidRange { .. } => {
				ApiError::BadClientDataError(e.to_string())
			}
			SummaryError::Storage(source) => source.into(),
			SummaryError::AmountOverflow(_) => {
				error!("Payment summary failed: {e}");
				ApiError::InternalServerError
			}
		}
	}
}

impl From<RepositoryError> for ApiError {
	fn from(e: RepositoryError) -> Self {
		error!("Payment store failure: {e}");
		ApiError::StorageError
	}
}

/// Malformed or incomplete JSON bodies are answered with the API error shape.
pub fn json_config() -> web::JsonConfig {
	web::JsonConfig::default().error_handler(|err, _req| {
		warn!("Rejected payment body: {err}");
		ApiError::BadClientDataError(err.to_string()).into()
	})
}

pub fn query_config() -> web::QueryConfig {
	web::QueryConfig::default().error_handler(|err, _req| {
		warn!("Rejected query string: {err}");
		ApiError::BadClientDataError(err.to_string()).into()
	})
}
