pub mod health_status;
pub mod payment;
pub mod payment_processor;
pub mod payment_router;
pub mod queue;
pub mod repository;
