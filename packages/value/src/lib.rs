//! Typed attribute values
//!
//! This layer gives attribute bytes a meaning. It adds:
//! - `Value`: a dynamically typed tree (booleans, integers, floats, strings,
//!   bytes, instants, arrays and string-keyed maps)
//! - `Codec` / `MessagePackCodec`: the canonical wire encoding of a `Value`
//! - `to_value` / `from_value`: conversions between Rust types and `Value`
//! - `encode` / `decode`: both steps at once
//!
//! Nothing here touches the filesystem. See `attrfs` for reading and
//! writing typed values on files.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let amir = Person { name: "Amir".to_string(), age: 30 };
//! let bytes = attrfs_value::encode(&amir)?;
//! let back: Person = attrfs_value::decode(&bytes)?;
//! assert_eq!(back, amir);
//!
//! // An absent value has no encoding.
//! assert!(attrfs_value::encode(&None::<i32>).is_err());
//! # Ok::<(), attrfs_value::Error>(())
//! ```

pub use bytes::Bytes;

mod codec;
mod de;
mod error;
pub mod instant;
mod ser;
mod value;
mod wire;

pub use codec::{Codec, MessagePackCodec};
pub use de::from_value;
pub use error::Error;
pub use ser::{to_value, ValueSerializer};
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize `data` and encode it with [`MessagePackCodec`].
///
/// Fails with [`Error::EncodingRejected`] before producing any bytes if
/// `data` contains something the wire format cannot represent.
///
/// `Vec<u8>` and `&[u8]` go through serde as sequences, so they encode as
/// arrays of integers. To store binary data as a byte string, encode a
/// [`Value::Bytes`] or mark the field with `serde_bytes`.
pub fn encode<T: Serialize + ?Sized>(data: &T) -> Result<Bytes, Error> {
    MessagePackCodec.encode(&to_value(data)?)
}

/// Decode `bytes` with [`MessagePackCodec`] and deserialize the result.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    from_value(MessagePackCodec.decode(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;

    #[test]
    fn scalars_round_trip() {
        assert!(decode::<bool>(&encode(&true).unwrap()).unwrap());
        assert_eq!(decode::<i64>(&encode(&1453).unwrap()).unwrap(), 1453);
        assert_eq!(decode::<f64>(&encode(&-0.5).unwrap()).unwrap(), -0.5);
        assert_eq!(
            decode::<String>(&encode("I am Amir").unwrap()).unwrap(),
            "I am Amir"
        );
    }

    #[test]
    fn collections_round_trip() {
        let years = vec![1970, 622, -323];
        assert_eq!(decode::<Vec<i32>>(&encode(&years).unwrap()).unwrap(), years);

        let mut person = BTreeMap::new();
        person.insert("name".to_string(), Value::from("Amir"));
        person.insert("age".to_string(), Value::from(30i64));
        let back: BTreeMap<String, Value> = decode(&encode(&person).unwrap()).unwrap();
        assert_eq!(back, person);
    }

    #[test]
    fn instants_keep_nanoseconds() {
        let at: DateTime<Utc> = DateTime::from_timestamp(1_529_000_000, 987_654_321).unwrap();
        let bytes = encode(&Value::Instant(at)).unwrap();
        assert_eq!(decode::<Value>(&bytes).unwrap(), Value::Instant(at));
    }

    #[test]
    fn instants_are_not_strings() {
        let at: DateTime<Utc> = DateTime::from_timestamp(1_529_000_000, 0).unwrap();
        let bytes = encode(&Value::Instant(at)).unwrap();
        assert!(matches!(decode::<String>(&bytes), Err(Error::TypeMismatch { .. })));
        assert!(matches!(
            decode::<DateTime<Utc>>(&bytes),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn byte_vectors_encode_as_integer_arrays() {
        let bytes = encode(&vec![0xFFu8, 0x20]).unwrap();
        assert_eq!(
            decode::<Value>(&bytes).unwrap(),
            Value::from(vec![0xFFi64, 0x20])
        );
        let raw = encode(&Value::Bytes(vec![0xFF, 0x20])).unwrap();
        assert_eq!(&raw[..], &[0xc4, 0x02, 0xFF, 0x20]);
    }

    #[test]
    fn none_is_rejected_before_encoding() {
        assert!(matches!(
            encode(&None::<String>),
            Err(Error::EncodingRejected { .. })
        ));
    }

    #[test]
    fn wrong_type_is_a_mismatch() {
        let bytes = encode("1453").unwrap();
        assert!(matches!(decode::<i64>(&bytes), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(decode::<i64>(&[0xcd]), Err(Error::Malformed { .. })));
    }
}
