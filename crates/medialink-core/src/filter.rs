//! Object filtering policies.
//!
//! A listing only surfaces objects that can actually be downloaded right
//! away. Two policies exist:
//!
//! | Policy | Tier | Size | Key |
//! |--------|------|------|-----|
//! | [`FilterPolicy::StandardOnly`] | `STANDARD` | > 0 | any |
//! | [`FilterPolicy::ExcludeGlacier`] | not `GLACIER` | > 0 | ends with the requested suffix |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{ObjectDescriptor, StorageClass};

/// Which objects a listing surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterPolicy {
    /// Only `STANDARD` objects with a positive size. Ignores the suffix.
    StandardOnly,
    /// Anything but `GLACIER`, with a positive size and a matching key suffix.
    #[default]
    ExcludeGlacier,
}

impl FilterPolicy {
    /// Policy name as used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StandardOnly => "standard-only",
            Self::ExcludeGlacier => "exclude-glacier",
        }
    }

    /// Whether this policy reads the `fileExtension` parameter.
    #[must_use]
    pub fn uses_suffix(self) -> bool {
        matches!(self, Self::ExcludeGlacier)
    }

    /// Return `true` if `object` should be surfaced to the caller.
    ///
    /// `suffix` is matched literally with "ends with", so an empty suffix
    /// matches every key and `"g"` matches both `.jpg` and `.png`.
    #[must_use]
    pub fn admits(self, object: &ObjectDescriptor, suffix: &str) -> bool {
        if !has_content(object.size) {
            return false;
        }
        match self {
            Self::StandardOnly => object.storage_class == Some(StorageClass::Standard),
            Self::ExcludeGlacier => {
                object.storage_class != Some(StorageClass::Glacier) && object.key.ends_with(suffix)
            }
        }
    }
}

impl fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter policy '{0}', expected 'standard-only' or 'exclude-glacier'")]
pub struct UnknownFilterPolicy(String);

impl FromStr for FilterPolicy {
    type Err = UnknownFilterPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard-only" | "standard" => Ok(Self::StandardOnly),
            "exclude-glacier" | "suffix" => Ok(Self::ExcludeGlacier),
            _ => Err(UnknownFilterPolicy(s.to_owned())),
        }
    }
}

fn has_content(size: Option<i64>) -> bool {
    size.is_some_and(|s| s > 0)
}
