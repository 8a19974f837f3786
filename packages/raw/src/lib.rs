//! Raw extended attribute access
//!
//! This is the byte layer of attrfs. It knows how to talk to the four OS
//! extended attribute primitives and nothing about what the bytes mean:
//! - `Target`: a local path (or a reference rejected as non-local)
//! - `AttributeStore`: exists / read / write / remove / list over bytes
//! - `Accessor`: the OS-backed store, with size negotiation and error mapping
//!
//! Reads and listings use a two-phase protocol: probe the size with a null
//! buffer, allocate exactly that much, then fill. The attribute can change
//! between the two calls; a value that grew is retried at most once (see
//! [`Config::retry_on_resize`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use attrfs_raw::{Error, Target};
//!
//! let target = Target::parse("/tmp/report.pdf");
//!
//! attrfs_raw::write(&target, "user.checksum", &[0xFF, 0x20])?;
//! assert!(attrfs_raw::exists(&target, "user.checksum"));
//!
//! attrfs_raw::remove(&target, "user.checksum")?;
//! assert!(matches!(
//!     attrfs_raw::read(&target, "user.checksum"),
//!     Err(Error::NotFound { .. })
//! ));
//! # Ok::<(), Error>(())
//! ```

mod accessor;
mod config;
mod error;
mod probe;
mod sys;
mod target;
mod traits;

pub use accessor::Accessor;
pub use config::{Config, NamePolicy};
pub use error::Error;
pub use target::Target;
pub use traits::AttributeStore;

/// Check whether `name` holds a non-empty value, with a default [`Accessor`].
pub fn exists(target: &Target, name: &str) -> bool {
    Accessor::new().exists(target, name)
}

/// Read the value of `name`, with a default [`Accessor`].
pub fn read(target: &Target, name: &str) -> Result<Vec<u8>, Error> {
    Accessor::new().read(target, name)
}

/// Create or replace `name`, with a default [`Accessor`].
pub fn write(target: &Target, name: &str, value: &[u8]) -> Result<(), Error> {
    Accessor::new().write(target, name, value)
}

/// Delete `name`, with a default [`Accessor`].
pub fn remove(target: &Target, name: &str) -> Result<(), Error> {
    Accessor::new().remove(target, name)
}

/// List attribute names, with a default [`Accessor`].
pub fn list(target: &Target) -> Result<Vec<String>, Error> {
    Accessor::new().list(target)
}
