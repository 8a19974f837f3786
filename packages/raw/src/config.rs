//! Accessor configuration.

use serde::{Deserialize, Serialize};

/// Tunables for an [`Accessor`](crate::Accessor).
///
/// Deserializable with defaults for every field, so a host application can
/// embed it in its own configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retry the probe/allocate/fill sequence once when the attribute grows
    /// between the size probe and the fill.
    pub retry_on_resize: bool,
    /// What `list` does with names that are not valid UTF-8.
    pub non_utf8_names: NamePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_on_resize: true,
            non_utf8_names: NamePolicy::Drop,
        }
    }
}

/// Handling of attribute names that are not valid UTF-8.
///
/// Attribute names are byte strings to the OS. [`Accessor::list_raw`]
/// always returns them untouched.
///
/// [`Accessor::list_raw`]: crate::Accessor::list_raw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Leave the name out of the listing.
    #[default]
    Drop,
    /// Include the name with invalid sequences replaced by U+FFFD.
    Lossy,
}

impl NamePolicy {
    pub(crate) fn decode(self, raw: &[u8]) -> Option<String> {
        match (std::str::from_utf8(raw), self) {
            (Ok(name), _) => Some(name.to_string()),
            (Err(_), NamePolicy::Drop) => None,
            (Err(_), NamePolicy::Lossy) => Some(String::from_utf8_lossy(raw).into_owned()),
        }
    }
}
