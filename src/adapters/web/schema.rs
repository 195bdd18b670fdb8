use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	#[serde(with = "rust_decimal::serde::float")]
	pub amount:         Decimal,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PaymentsSummaryFilter {
	#[serde(default, deserialize_with = "optional_timestamp")]
	pub from: Option<OffsetDateTime>,
	#[serde(default, deserialize_with = "optional_timestamp")]
	pub to:   Option<OffsetDateTime>,
}

/// An absent or empty bound means an open-ended window.
fn optional_timestamp<'de, D>(
	deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;
	match raw.as_deref().map(str::trim) {
		None | Some("") => Ok(None),
		Some(value) => OffsetDateTime::parse(value, &Rfc3339)
			.map(Some)
			.map_err(serde::de::Error::custom),
	}
}
