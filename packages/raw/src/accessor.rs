//! The raw attribute accessor.

use log::trace;

use crate::probe::{probe_and_fill, split_names};
use crate::target::c_name;
use crate::{sys, AttributeStore, Config, Error, Target};

/// Reads and writes extended attributes as raw bytes.
///
/// The accessor holds only its [`Config`]. Every call is a fresh OS round
/// trip: sizes and contents are never remembered between calls, so an
/// attribute changed by another process is always seen as it is now.
///
/// # Example
///
/// ```rust,no_run
/// use attrfs_raw::{Accessor, AttributeStore, Target};
///
/// let accessor = Accessor::new();
/// let target = Target::parse("/tmp/report.pdf");
///
/// accessor.write(&target, "user.reviewed", b"yes")?;
/// assert_eq!(accessor.read(&target, "user.reviewed")?, b"yes");
/// # Ok::<(), attrfs_raw::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Accessor {
    config: Config,
}

impl Accessor {
    /// Create an accessor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accessor with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List attribute names as the undecoded byte strings the OS reports.
    ///
    /// Unlike [`AttributeStore::list`], no name is ever dropped.
    pub fn list_raw(&self, target: &Target) -> Result<Vec<Vec<u8>>, Error> {
        let packed = self.packed_names(target)?;
        Ok(split_names(&packed).map(<[u8]>::to_vec).collect())
    }

    fn packed_names(&self, target: &Target) -> Result<Vec<u8>, Error> {
        let path = target.c_path()?;
        trace!("listxattr {}", target);
        probe_and_fill(self.config.retry_on_resize, |buf| sys::list(&path, buf)).map_err(Error::os)
    }
}

impl AttributeStore for Accessor {
    fn exists(&self, target: &Target, name: &str) -> bool {
        let Ok(path) = target.c_path() else {
            return false;
        };
        let Ok(attr) = c_name(name) else {
            return false;
        };
        trace!("getxattr probe {} {}", target, name);
        matches!(sys::get(&path, &attr, &mut []), Ok(size) if size > 0)
    }

    fn read(&self, target: &Target, name: &str) -> Result<Vec<u8>, Error> {
        let path = target.c_path()?;
        let attr = c_name(name)?;
        trace!("getxattr {} {}", target, name);
        probe_and_fill(self.config.retry_on_resize, |buf| {
            sys::get(&path, &attr, buf)
        })
        .map_err(|err| Error::for_attribute(err, name))
    }

    fn write(&self, target: &Target, name: &str, value: &[u8]) -> Result<(), Error> {
        let path = target.c_path()?;
        let attr = c_name(name)?;
        trace!("setxattr {} {} ({} bytes)", target, name, value.len());
        sys::set(&path, &attr, value).map_err(|err| Error::for_attribute(err, name))
    }

    fn remove(&self, target: &Target, name: &str) -> Result<(), Error> {
        let path = target.c_path()?;
        let attr = c_name(name)?;
        trace!("removexattr {} {}", target, name);
        sys::remove(&path, &attr).map_err(|err| Error::for_attribute(err, name))
    }

    fn list(&self, target: &Target) -> Result<Vec<String>, Error> {
        let packed = self.packed_names(target)?;
        let policy = self.config.non_utf8_names;
        Ok(split_names(&packed)
            .filter_map(|raw| policy.decode(raw))
            .collect())
    }
}
