use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::{info, warn};
use reqwest::Client;
use tokio::sync::watch;

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod model;
pub mod use_cases;

use crate::adapters::web::errors::{json_config, query_config};
use crate::adapters::web::handlers::{payments, payments_purge, payments_summary};
use crate::domain::payment_processor::PaymentProcessors;
use crate::domain::repository::SharedPaymentRepository;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::persistence::in_memory_payment_repository::InMemoryPaymentRepository;
use crate::infrastructure::persistence::redis_payment_repository::RedisPaymentRepository;
use crate::infrastructure::queue::in_memory_payment_queue::PaymentQueue;
use crate::infrastructure::routing::in_memory_payment_router::InMemoryPaymentRouter;
use crate::infrastructure::routing::processor_health_monitor::ProcessorHealthMonitor;
use crate::infrastructure::workers::payment_processor_worker::PaymentWorkerPool;
use crate::infrastructure::workers::processor_health_monitor_worker::processor_health_monitor_worker;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use crate::use_cases::health_check::HealthCheckUseCase;
use crate::use_cases::process_payment::ProcessPaymentUseCase;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

fn init_logging() {
	// A logger installed by the embedding process or an earlier run wins.
	let _ = env_logger::Builder::from_env(
		env_logger::Env::default().default_filter_or("info"),
	)
	.try_init();
}

fn payment_repository(config: &Config) -> std::io::Result<SharedPaymentRepository> {
	match &config.redis_url {
		Some(url) => {
			let client = redis::Client::open(url.as_str()).map_err(|e| {
				std::io::Error::other(format!("invalid Redis URL '{url}': {e}"))
			})?;
			info!("Recording payment outcomes in Redis at {url}");
			Ok(Arc::new(RedisPaymentRepository::new(client)))
		}
		None => {
			info!("Recording payment outcomes in memory");
			Ok(Arc::new(InMemoryPaymentRepository::new()))
		}
	}
}

/// Serves the payment API until the server is shut down, then drains the
/// worker pool and stops the health refresher.
pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	init_logging();

	let http_client = Client::new();
	let payment_repo = payment_repository(&config)?;

	let processors = PaymentProcessors::new(
		config.default_payment_processor_url.as_str(),
		config.fallback_payment_processor_url.as_str(),
	);
	let monitor = Arc::new(ProcessorHealthMonitor::new());
	let health_check = HealthCheckUseCase::new(
		Arc::clone(&monitor),
		processors.clone(),
		http_client.clone(),
		config.health_check_settings(),
	);
	let router = InMemoryPaymentRouter::new(processors, monitor);
	let process_payment_use_case = ProcessPaymentUseCase::new(
		Arc::clone(&payment_repo),
		router,
		health_check.clone(),
		http_client,
		config.dispatch_timeout(),
	);

	let payment_queue = PaymentQueue::new(config.queue_capacity);
	let create_payment_use_case = web::Data::new(CreatePaymentUseCase::new(
		payment_queue.clone(),
		config.overload_policy,
	));
	let get_payment_summary_use_case =
		web::Data::new(GetPaymentSummaryUseCase::new(Arc::clone(&payment_repo)));
	let purge_payments_use_case =
		web::Data::new(PurgePaymentsUseCase::new(Arc::clone(&payment_repo)));

	let server_create_payment = create_payment_use_case.clone();
	let server = HttpServer::new(move || {
		App::new()
			.app_data(json_config())
			.app_data(query_config())
			.app_data(server_create_payment.clone())
			.app_data(get_payment_summary_use_case.clone())
			.app_data(purge_payments_use_case.clone())
			.service(payments)
			.service(payments_summary)
			.service(payments_purge)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind((config.server_host.as_str(), config.server_port))?
	.run();

	info!(
		"Starting Actix-Web server on {}:{}...",
		config.server_host, config.server_port
	);

	let worker_pool = PaymentWorkerPool::new(payment_queue, process_payment_use_case);
	worker_pool.start(config.worker_count);

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let refresher = tokio::spawn(processor_health_monitor_worker(
		health_check,
		config.health_check_interval(),
		shutdown_rx,
	));

	let served = server.await;

	info!("Server stopped, draining payment workers...");
	worker_pool.stop().await;
	let _ = shutdown_tx.send(true);
	if let Err(e) = refresher.await {
		warn!("Health refresher ended abnormally: {e}");
	}
	info!(
		"Shutdown complete ({} payments dropped at intake)",
		create_payment_use_case.dropped()
	);

	served
}
