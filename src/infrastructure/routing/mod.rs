pub mod in_memory_payment_router;
pub mod processor_health_monitor;
