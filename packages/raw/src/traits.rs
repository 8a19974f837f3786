//! The attribute store trait.

use crate::{Error, Target};

/// Byte-level access to the extended attributes of a target.
///
/// Names are plain strings and values are opaque bytes. No encoding, no value
/// semantics. [`Accessor`](crate::Accessor) is the OS-backed implementation.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn AttributeStore>`.
pub trait AttributeStore: Send + Sync {
    /// Check whether `name` holds a non-empty value.
    ///
    /// Never fails: a non-local target, a bad name, or any OS error all
    /// report `false`. A zero-length attribute also reports `false`.
    fn exists(&self, target: &Target, name: &str) -> bool;

    /// Read the full value of `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(bytes)` - The value, possibly empty.
    /// * `Err(Error::NotFound)` - The attribute does not exist.
    /// * `Err(Error::InvalidTarget)` - The target is not a local path.
    /// * `Err(Error::Os)` - Any other OS failure.
    fn read(&self, target: &Target, name: &str) -> Result<Vec<u8>, Error>;

    /// Create or replace `name` with exactly `value`.
    ///
    /// An empty `value` creates a zero-length attribute.
    fn write(&self, target: &Target, name: &str, value: &[u8]) -> Result<(), Error>;

    /// Delete `name`.
    ///
    /// Fails with `Error::NotFound` if it does not exist.
    fn remove(&self, target: &Target, name: &str) -> Result<(), Error>;

    /// List the attribute names present on the target right now.
    ///
    /// Order is whatever the OS reports.
    fn list(&self, target: &Target) -> Result<Vec<String>, Error>;
}
