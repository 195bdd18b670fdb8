use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifies one of the two interchangeable downstream processors.
///
/// The wire names (`default`, `fallback`) are the ones used by the summary
/// response and by the stored outcomes.
#[derive(
	Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ProcessorId {
	#[display("default")]
	#[serde(rename = "default")]
	Primary,
	#[display("fallback")]
	#[serde(rename = "fallback")]
	Secondary,
}

impl ProcessorId {
	pub const ALL: [ProcessorId; 2] = [ProcessorId::Primary, ProcessorId::Secondary];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProcessor {
	pub id:  ProcessorId,
	pub url: String,
}

impl PaymentProcessor {
	pub fn new(id: ProcessorId, url: impl Into<String>) -> Self {
		let url = url.into();
		Self {
			id,
			url: url.trim_end_matches('/').to_string(),
		}
	}

	pub fn payments_url(&self) -> String {
		format!("{}/payments", self.url)
	}

	pub fn service_health_url(&self) -> String {
		format!("{}/payments/service-health", self.url)
	}
}

/// The primary/secondary pair the service routes between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProcessors {
	pub primary:   PaymentProcessor,
	pub secondary: PaymentProcessor,
}

impl PaymentProcessors {
	pub fn new(primary_url: impl Into<String>, secondary_url: impl Into<String>) -> Self {
		Self {
			primary:   PaymentProcessor::new(ProcessorId::Primary, primary_url),
			secondary: PaymentProcessor::new(ProcessorId::Secondary, secondary_url),
		}
	}

	pub fn get(&self, id: ProcessorId) -> &PaymentProcessor {
		match id {
			ProcessorId::Primary => &self.primary,
			ProcessorId::Secondary => &self.secondary,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &PaymentProcessor> {
		[&self.primary, &self.secondary].into_iter()
	}
}
