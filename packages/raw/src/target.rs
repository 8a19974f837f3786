//! Targets: which filesystem entry an attribute operation applies to.

use std::ffi::CString;
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::Error;

/// The filesystem entry an attribute operation applies to.
///
/// Only local paths can carry extended attributes. Anything else (an
/// `https:` URL, a `file:` URL naming a remote host) is kept as `NonLocal`
/// so the accessor can reject it before any OS call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// A path on a locally mounted filesystem.
    Local(PathBuf),
    /// A reference that does not resolve to a local path.
    NonLocal(String),
}

impl Target {
    /// Parse a target from a string.
    ///
    /// A string is read as a URL only if it starts with `file:` or contains
    /// `://`. URLs are classified by scheme: `file:` URLs become local paths,
    /// every other scheme is non-local. Anything else, including a file name
    /// with a colon such as `report:v2.txt`, is a plain filesystem path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use attrfs_raw::Target;
    ///
    /// assert!(Target::parse("/tmp/notes.txt").is_local());
    /// assert!(Target::parse("notes:2024.md").is_local());
    /// assert!(Target::parse("file:///tmp/notes.txt").is_local());
    /// assert!(!Target::parse("https://example.com/notes.txt").is_local());
    /// ```
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Target::NonLocal(String::new());
        }
        if !(s.starts_with("file:") || s.contains("://")) {
            return Target::Local(PathBuf::from(s));
        }
        match Url::parse(s) {
            Ok(url) => Target::from(url),
            Err(_) => Target::Local(PathBuf::from(s)),
        }
    }

    /// The local path, if this target has one.
    ///
    /// This is the guard every operation runs first.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Target::Local(path) if !path.as_os_str().is_empty() => Some(path),
            _ => None,
        }
    }

    /// Check if this target resolves to a local path.
    pub fn is_local(&self) -> bool {
        self.local_path().is_some()
    }

    /// Return the local path, or `InvalidTarget`.
    pub fn ensure_local(&self) -> Result<&Path, Error> {
        self.local_path().ok_or_else(|| Error::InvalidTarget {
            target: self.to_string(),
        })
    }

    /// The local path as a C string for the OS boundary.
    pub(crate) fn c_path(&self) -> Result<CString, Error> {
        let path = self.ensure_local()?;
        CString::new(path.as_os_str().as_bytes()).map_err(|_| Error::InvalidTarget {
            target: self.to_string(),
        })
    }
}

/// Convert an attribute name for the OS boundary.
pub(crate) fn c_name(name: &str) -> Result<CString, Error> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: String::new(),
        });
    }
    CString::new(name).map_err(|_| Error::InvalidName {
        name: name.to_string(),
    })
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Local(path) => write!(f, "{}", path.display()),
            Target::NonLocal(reference) => write!(f, "{}", reference),
        }
    }
}

impl From<Url> for Target {
    fn from(url: Url) -> Self {
        if url.scheme() != "file" {
            return Target::NonLocal(url.into());
        }
        match url.to_file_path() {
            Ok(path) => Target::Local(path),
            Err(()) => Target::NonLocal(url.into()),
        }
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::Local(path)
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        Target::Local(path.to_path_buf())
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_local() {
        let target = Target::parse("/var/tmp/report.pdf");
        assert_eq!(target.local_path(), Some(Path::new("/var/tmp/report.pdf")));

        let target = Target::parse("relative/report.pdf");
        assert!(target.is_local());

        for colon in ["report:v2.txt", "notes:2024.md", "C:report.txt"] {
            let target = Target::parse(colon);
            assert_eq!(target.local_path(), Some(Path::new(colon)), "{}", colon);
        }
    }

    #[test]
    fn file_urls_resolve_to_paths() {
        let target = Target::parse("file:///var/tmp/report.pdf");
        assert_eq!(target.local_path(), Some(Path::new("/var/tmp/report.pdf")));

        let target = Target::parse("file:///var/tmp/with%20space.txt");
        assert_eq!(target.local_path(), Some(Path::new("/var/tmp/with space.txt")));
    }

    #[test]
    fn other_schemes_are_non_local() {
        for reference in [
            "https://example.com/report.pdf",
            "smb://fileserver/share/report.pdf",
            "file://fileserver/share/report.pdf",
        ] {
            let target = Target::parse(reference);
            assert!(!target.is_local(), "{} should be non-local", reference);
            assert!(matches!(
                target.ensure_local(),
                Err(Error::InvalidTarget { .. })
            ));
        }
    }

    #[test]
    fn empty_targets_are_rejected() {
        assert!(!Target::parse("").is_local());
        assert!(!Target::from(PathBuf::new()).is_local());
    }

    #[test]
    fn interior_nul_is_an_invalid_target() {
        let target = Target::Local(PathBuf::from("bad\0path"));
        assert!(matches!(target.c_path(), Err(Error::InvalidTarget { .. })));
    }

    #[test]
    fn names_must_be_non_empty_without_nul() {
        assert!(c_name("user.tag").is_ok());
        assert!(matches!(c_name(""), Err(Error::InvalidName { .. })));
        assert!(matches!(c_name("user.\0tag"), Err(Error::InvalidName { .. })));
    }

    #[test]
    fn display_shows_the_reference() {
        assert_eq!(Target::parse("/tmp/a").to_string(), "/tmp/a");
        assert_eq!(
            Target::parse("https://example.com/a").to_string(),
            "https://example.com/a"
        );
    }
}
