pub mod payment_processor_worker;
pub mod processor_health_monitor_worker;
