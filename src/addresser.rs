//! Content addressing: deriving a storage key from secret bytes.
//!
//! Keys are `<fnv1a-64 as decimal>.txt`. FNV is not collision resistant;
//! two different payloads with the same digest share one object, and the
//! second submitter gets a link to the first submitter's content.

use std::{fmt, hash::Hasher};

use fnv::FnvHasher;

/// Suffix appended to every digest.
pub const KEY_EXTENSION: &str = ".txt";

/// A storage key derived from content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Maps content to the key it is stored under.
///
/// Implementations must be pure: equal input bytes always give equal keys.
pub trait ContentAddresser: Send + Sync {
    fn address(&self, data: &[u8]) -> ObjectKey;
}

/// FNV-1a 64-bit addresser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv64Addresser;

impl ContentAddresser for Fnv64Addresser {
    fn address(&self, data: &[u8]) -> ObjectKey {
        let mut hasher = FnvHasher::default();
        hasher.write(data);
        ObjectKey(format!("{}{}", hasher.finish(), KEY_EXTENSION))
    }
}
