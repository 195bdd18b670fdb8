use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

/// Switchable behaviour of a fake downstream processor.
pub struct FakeProcessorState {
	failing:           AtomicBool,
	min_response_time: AtomicU64,
	payment_status:    AtomicU16,
	payment_delay:     AtomicU64,
	health_status:     AtomicU16,
	health_checks:     AtomicUsize,
	payments:          Mutex<Vec<Value>>,
}

impl Default for FakeProcessorState {
	fn default() -> Self {
		Self {
			failing:           AtomicBool::new(false),
			min_response_time: AtomicU64::new(0),
			payment_status:    AtomicU16::new(200),
			payment_delay:     AtomicU64::new(0),
			health_status:     AtomicU16::new(200),
			health_checks:     AtomicUsize::new(0),
			payments:          Mutex::new(Vec::new()),
		}
	}
}

pub struct FakePaymentProcessor {
	pub url: String,
	state:   Arc<FakeProcessorState>,
	handle:  ServerHandle,
}

impl FakePaymentProcessor {
	/// Serves the processor API on an ephemeral local port. Must be called
	/// from within an actix system, e.g. an `#[actix_web::test]`.
	pub fn start() -> Self {
		let _ = env_logger::builder().is_test(true).try_init();

		let state = Arc::new(FakeProcessorState::default());
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let port = listener.local_addr().unwrap().port();

		let data = web::Data::from(Arc::clone(&state));
		let server = HttpServer::new(move || {
			App::new()
				.app_data(data.clone())
				.route("/payments", web::post().to(receive_payment))
				.route("/payments/service-health", web::get().to(service_health))
		})
		.workers(1)
		.disable_signals()
		.listen(listener)
		.unwrap()
		.run();
		let handle = server.handle();
		actix_web::rt::spawn(server);

		Self {
			url: format!("http://127.0.0.1:{port}"),
			state,
			handle,
		}
	}

	pub fn set_failing(&self, failing: bool) {
		self.state.failing.store(failing, Ordering::SeqCst);
	}

	pub fn set_min_response_time(&self, millis: u64) {
		self.state.min_response_time.store(millis, Ordering::SeqCst);
	}

	pub fn set_payment_status(&self, status: u16) {
		self.state.payment_status.store(status, Ordering::SeqCst);
	}

	/// Holds every payment response back by `millis`. The payment is recorded
	/// as received before the delay.
	pub fn set_payment_delay(&self, millis: u64) {
		self.state.payment_delay.store(millis, Ordering::SeqCst);
	}

	pub fn set_health_status(&self, status: u16) {
		self.state.health_status.store(status, Ordering::SeqCst);
	}

	pub fn health_checks(&self) -> usize {
		self.state.health_checks.load(Ordering::SeqCst)
	}

	/// Every payment body received, accepted or not.
	pub fn payments(&self) -> Vec<Value> {
		self.state.payments.lock().unwrap().clone()
	}

	pub async fn stop(self) {
		self.handle.stop(false).await;
	}
}

async fn receive_payment(
	state: web::Data<FakeProcessorState>,
	body: web::Json<Value>,
) -> HttpResponse {
	state.payments.lock().unwrap().push(body.into_inner());
	let delay = state.payment_delay.load(Ordering::SeqCst);
	if delay > 0 {
		tokio::time::sleep(Duration::from_millis(delay)).await;
	}
	let status =
		StatusCode::from_u16(state.payment_status.load(Ordering::SeqCst)).unwrap();
	HttpResponse::build(status)
		.json(json!({ "message": "payment processed successfully" }))
}

async fn service_health(state: web::Data<FakeProcessorState>) -> HttpResponse {
	state.health_checks.fetch_add(1, Ordering::SeqCst);
	let status =
		StatusCode::from_u16(state.health_status.load(Ordering::SeqCst)).unwrap();
	if status != StatusCode::OK {
		return HttpResponse::build(status).finish();
	}
	HttpResponse::Ok().json(json!({
		"failing": state.failing.load(Ordering::SeqCst),
		"minResponseTime": state.min_response_time.load(Ordering::SeqCst),
	}))
}
