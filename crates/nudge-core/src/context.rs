//! Context tracker: the single "current scene" identifier that reaction-class
//! notifications are scoped to.

use md5::{Digest, Md5};

/// Number of hex characters kept from the scene digest.
const SCENE_HASH_LEN: usize = 16;

/// Holds exactly one current scene identifier.
///
/// Reads always reflect the latest write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextTracker {
    current: Option<String>,
}

impl ContextTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current scene. Returns `true` if the value changed.
    pub fn set(&mut self, hash: &str) -> bool {
        if self.current.as_deref() == Some(hash) {
            return false;
        }
        self.current = Some(hash.to_owned());
        true
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Derive a scene identifier from the active application and window title.
///
/// Case-insensitive: `"Code:main.rs"` and `"code:MAIN.rs"` hash the same.
/// Same derivation as the observation backend (truncated MD5 of the
/// lowercased `"{app}:{window}"`), so hashes from either side compare equal.
pub fn scene_hash(app_name: &str, window_title: &str) -> String {
    let key = format!("{app_name}:{window_title}").to_lowercase();
    let digest = Md5::digest(key.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(SCENE_HASH_LEN);
    hex
}
