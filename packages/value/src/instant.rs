//! Serde helpers for storing `DateTime<Utc>` as an instant.
//!
//! `chrono` serializes timestamps as strings. Use this module with
//! `#[serde(with = "attrfs_value::instant")]` to store a field as a native
//! instant instead:
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Provenance {
//!     source: String,
//!     #[serde(with = "attrfs_value::instant")]
//!     fetched_at: DateTime<Utc>,
//! }
//!
//! let provenance = Provenance {
//!     source: "https://example.com/report.pdf".to_string(),
//!     fetched_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
//! };
//! let value = attrfs_value::to_value(&provenance).unwrap();
//! assert!(value.get("fetched_at").unwrap().as_instant().is_some());
//! ```
//!
//! An instant only reads back through this helper. A plain `DateTime<Utc>`
//! or `String` field fails with a type mismatch. The helper also accepts
//! RFC 3339 strings, so fields written before switching to it still decode.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::Serializer;

use crate::Value;

/// Newtype name that marks an instant on its way through the serde data
/// model. The value serializer and deserializer recognize it.
pub(crate) const TOKEN: &str = "$attrfs::private::Instant";

/// Serialize an instant as a newtype around `(seconds, nanoseconds)`.
pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_newtype_struct(
        TOKEN,
        &(instant.timestamp(), instant.timestamp_subsec_nanos()),
    )
}

/// Deserialize an instant written by [`serialize`] or as an RFC 3339 string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    deserializer.deserialize_newtype_struct(TOKEN, InstantVisitor)
}

pub(crate) fn from_parts(secs: i64, nanos: u32) -> Option<DateTime<Utc>> {
    if nanos >= 1_000_000_000 {
        return None;
    }
    DateTime::from_timestamp(secs, nanos)
}

/// The `(seconds, nanoseconds)` pair as a value, for deserializers.
pub(crate) fn parts(instant: &DateTime<Utc>) -> Value {
    Value::Array(vec![
        Value::Integer(instant.timestamp()),
        Value::Integer(instant.timestamp_subsec_nanos().into()),
    ])
}

/// Rebuild an instant from the value its parts serialized to.
pub(crate) fn from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value.as_array()? {
        [Value::Integer(secs), Value::Integer(nanos)] => {
            from_parts(*secs, u32::try_from(*nanos).ok()?)
        }
        _ => None,
    }
}

struct InstantVisitor;

impl<'de> Visitor<'de> for InstantVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an instant")
    }

    // Foreign formats hand over whatever they stored: a pair or a string.
    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let secs: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let nanos: u32 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        from_parts(secs, nanos).ok_or_else(|| de::Error::custom("instant out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        DateTime::parse_from_rfc3339(v)
            .map(|t| t.with_timezone(&Utc))
            .map_err(E::custom)
    }
}
