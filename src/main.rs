use std::sync::Arc;

use payment_dispatcher::infrastructure::config::settings::Config;
use payment_dispatcher::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config = Arc::new(Config::load().expect("Failed to load configuration"));
	run(config).await
}
