//! Typed attribute extension trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

use attrfs_raw::{AttributeStore, Target};
use attrfs_value::{from_value, to_value, Codec, MessagePackCodec, Value};

use crate::Error;

/// Extension trait for typed attribute access.
///
/// This trait is automatically implemented for all `AttributeStore`
/// implementations. Values go through a [`Codec`]; the plain methods use
/// [`MessagePackCodec`].
///
/// # Example
///
/// ```rust,no_run
/// use attrfs::{Accessor, Target, TypedAttributes};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Provenance {
///     source: String,
///     reviewed: bool,
/// }
///
/// fn mark_reviewed(target: &Target) -> Result<(), attrfs::Error> {
///     let accessor = Accessor::new();
///     let mut provenance: Provenance = accessor.read_as(target, "user.provenance")?;
///     provenance.reviewed = true;
///     accessor.write_as(target, "user.provenance", &provenance)
/// }
/// ```
pub trait TypedAttributes: AttributeStore {
    /// Read an attribute and decode it with `codec`.
    fn read_value_with(
        &self,
        target: &Target,
        name: &str,
        codec: &dyn Codec,
    ) -> Result<Value, Error> {
        let bytes = self.read(target, name)?;
        log::trace!("decoding {} bytes from {}", bytes.len(), name);
        Ok(codec.decode(&bytes)?)
    }

    /// Encode a value with `codec` and write it.
    fn write_value_with(
        &self,
        target: &Target,
        name: &str,
        value: &Value,
        codec: &dyn Codec,
    ) -> Result<(), Error> {
        target.ensure_local()?;
        let bytes = codec.encode(value)?;
        log::trace!("encoded {} for {} as {} bytes", value.kind(), name, bytes.len());
        self.write(target, name, &bytes)?;
        Ok(())
    }

    /// Read an attribute as a [`Value`].
    ///
    /// Useful when the shape is not known up front: match on the result.
    fn read_value(&self, target: &Target, name: &str) -> Result<Value, Error> {
        self.read_value_with(target, name, &MessagePackCodec)
    }

    /// Write a [`Value`].
    fn write_value(&self, target: &Target, name: &str, value: &Value) -> Result<(), Error> {
        self.write_value_with(target, name, value, &MessagePackCodec)
    }

    /// Read an attribute and deserialize it into `T`.
    ///
    /// Fails with a type mismatch if the stored value has a different shape.
    fn read_as<T: DeserializeOwned>(&self, target: &Target, name: &str) -> Result<T, Error> {
        let value = self.read_value(target, name)?;
        Ok(from_value(value)?)
    }

    /// Serialize `data` and write it.
    ///
    /// The conversion happens before the attribute is touched: data the wire
    /// format cannot represent (such as a `None` entry) fails with an
    /// encoding error and leaves the attribute as it was.
    ///
    /// A `Vec<u8>` or `&[u8]` is written as an array of integers. Write
    /// binary data with [`write_value`](Self::write_value) and
    /// [`Value::Bytes`], or mark the field with `serde_bytes`.
    fn write_as<T: Serialize + ?Sized>(
        &self,
        target: &Target,
        name: &str,
        data: &T,
    ) -> Result<(), Error> {
        target.ensure_local()?;
        let value = to_value(data)?;
        self.write_value(target, name, &value)
    }
}

// Blanket implementation for all attribute stores
impl<S: AttributeStore + ?Sized> TypedAttributes for S {}
