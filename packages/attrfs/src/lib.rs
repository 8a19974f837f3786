//! Typed, safe access to filesystem extended attributes
//!
//! Extended attributes are named byte slots the OS keeps next to a file's
//! content. attrfs reads and writes them either as raw bytes or as typed
//! values encoded with MessagePack.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ attrfs (this crate)                  │
//! │ TypedAttributes, unified Error       │
//! ├──────────────────┬───────────────────┤
//! │ attrfs-value     │ attrfs-raw        │
//! │ Value, Codec,    │ Accessor, Target, │
//! │ serde bridge     │ OS boundary       │
//! └──────────────────┴───────────────────┘
//! ```
//!
//! The raw layer is usable on its own for binary attributes; the value layer
//! never touches the filesystem.
//!
//! # Example
//!
//! ```rust,no_run
//! use attrfs::Target;
//! use std::collections::BTreeMap;
//!
//! let target = Target::parse("/tmp/report.pdf");
//!
//! let mut person = BTreeMap::new();
//! person.insert("name", attrfs::Value::from("Amir"));
//! person.insert("age", attrfs::Value::from(30i64));
//! attrfs::write_as(&target, "user.person", &person)?;
//!
//! let back: BTreeMap<String, attrfs::Value> = attrfs::read_as(&target, "user.person")?;
//! assert_eq!(back["age"].as_i64(), Some(30));
//!
//! for name in attrfs::list(&target)? {
//!     println!("{}", name);
//! }
//! # Ok::<(), attrfs::Error>(())
//! ```

mod error;
mod typed;

pub use error::{Error, ErrorKind};
pub use typed::TypedAttributes;

pub use attrfs_raw::{Accessor, AttributeStore, Config, NamePolicy, Target};
pub use attrfs_value::{instant, Codec, MessagePackCodec, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Check whether `name` holds a non-empty value.
///
/// Never fails: anything that goes wrong reports `false`.
pub fn exists(target: &Target, name: &str) -> bool {
    Accessor::new().exists(target, name)
}

/// Read the raw bytes of `name`.
pub fn read(target: &Target, name: &str) -> Result<Vec<u8>, Error> {
    Ok(Accessor::new().read(target, name)?)
}

/// Create or replace `name` with exactly `value`.
pub fn write(target: &Target, name: &str, value: &[u8]) -> Result<(), Error> {
    Ok(Accessor::new().write(target, name, value)?)
}

/// Delete `name`.
pub fn remove(target: &Target, name: &str) -> Result<(), Error> {
    Ok(Accessor::new().remove(target, name)?)
}

/// List the names of the attributes on `target`.
///
/// Names that are not valid UTF-8 are left out; see
/// [`Accessor::list_raw`] to see every name.
pub fn list(target: &Target) -> Result<Vec<String>, Error> {
    Ok(Accessor::new().list(target)?)
}

/// Read `name` as a [`Value`].
pub fn read_value(target: &Target, name: &str) -> Result<Value, Error> {
    Accessor::new().read_value(target, name)
}

/// Write a [`Value`] to `name`.
pub fn write_value(target: &Target, name: &str, value: &Value) -> Result<(), Error> {
    Accessor::new().write_value(target, name, value)
}

/// Read `name` and deserialize it into `T`.
pub fn read_as<T: DeserializeOwned>(target: &Target, name: &str) -> Result<T, Error> {
    Accessor::new().read_as(target, name)
}

/// Serialize `data` and write it to `name`.
///
/// Nothing is written if `data` cannot be encoded. Byte vectors become
/// integer arrays; see [`TypedAttributes::write_as`].
pub fn write_as<T: Serialize + ?Sized>(target: &Target, name: &str, data: &T) -> Result<(), Error> {
    Accessor::new().write_as(target, name, data)
}
