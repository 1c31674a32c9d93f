//! Owner name resolution with a per-uid cache shared across parallel parses.

use ahash::RandomState;
use dashmap::DashMap;
use nix::unistd::{Uid, User};
use tracing::debug;

/// Maps a numeric uid to a user name.
pub trait UserLookup: Send + Sync {
    fn lookup(&self, uid: u32) -> Option<String>;
}

/// Looks up names in the system user database.
pub struct SystemUsers;

impl UserLookup for SystemUsers {
    fn lookup(&self, uid: u32) -> Option<String> {
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => Some(user.name),
            Ok(None) => None,
            Err(e) => {
                debug!("Failed to lookup uid {}: {}", uid, e);
                None
            }
        }
    }
}

/// Caching resolver. Unknown uids resolve to the uid rendered as text.
pub struct UserResolver {
    lookup: Box<dyn UserLookup>,
    cache: DashMap<u32, String, RandomState>,
}

impl UserResolver {
    pub fn new(lookup: Box<dyn UserLookup>) -> Self {
        Self {
            lookup,
            cache: DashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemUsers))
    }

    pub fn resolve(&self, uid: u32) -> String {
        if let Some(name) = self.cache.get(&uid) {
            return name.value().clone();
        }
        let name = self.lookup.lookup(uid).unwrap_or_else(|| uid.to_string());
        self.cache.insert(uid, name.clone());
        name
    }
}

impl Default for UserResolver {
    fn default() -> Self {
        Self::system()
    }
}
