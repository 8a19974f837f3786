//! The codec seam between values and attribute bytes.

use bytes::Bytes;

use crate::{wire, Error, Value};

/// Converts between [`Value`]s and the bytes stored in an attribute.
///
/// Typed attribute access goes through a codec, so a different encoding can
/// be swapped in without touching the attribute layer.
///
/// # Example
///
/// ```rust
/// use attrfs_value::{Codec, MessagePackCodec, Value};
///
/// let codec = MessagePackCodec;
/// let value = Value::from(vec![1970i64, 622, -323]);
///
/// let bytes = codec.encode(&value).unwrap();
/// assert_eq!(codec.decode(&bytes).unwrap(), value);
/// ```
pub trait Codec: Send + Sync {
    /// Encode a value into attribute bytes.
    fn encode(&self, value: &Value) -> Result<Bytes, Error>;

    /// Decode attribute bytes into a value.
    fn decode(&self, bytes: &[u8]) -> Result<Value, Error>;
}

/// The default codec: canonical MessagePack.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackCodec;

impl Codec for MessagePackCodec {
    fn encode(&self, value: &Value) -> Result<Bytes, Error> {
        wire::to_bytes(value).map(Bytes::from)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, Error> {
        wire::from_bytes(bytes)
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn encode(&self, value: &Value) -> Result<Bytes, Error> {
        (**self).encode(value)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, Error> {
        (**self).decode(bytes)
    }
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn encode(&self, value: &Value) -> Result<Bytes, Error> {
        (**self).encode(value)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, Error> {
        (**self).decode(bytes)
    }
}
