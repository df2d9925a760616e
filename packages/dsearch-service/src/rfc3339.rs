//! `#[serde(with = "crate::rfc3339")]` for datastore timestamps.

use serde::{Deserialize, Deserializer, Serializer, de, ser};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	value
		.format(&Rfc3339)
		.map_err(ser::Error::custom)
		.and_then(|formatted| serializer.serialize_str(&formatted))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	OffsetDateTime::parse(&raw, &Rfc3339)
		.map_err(|err| de::Error::custom(format!("Invalid RFC 3339 timestamp {raw:?}: {err}.")))
}
