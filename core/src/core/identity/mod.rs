//! Daily identity derivation.
//!
//! `day_salt = blake3(utc_date || secret)` and
//! `identity = blake3(address || hex(day_salt))`. The same address maps to a
//! different identity each UTC day, and raw addresses never leave this module.

use crate::types::{IdentityHash, ServerSecret};
use chrono::{DateTime, Utc};
use std::time::SystemTime;

pub struct IdentityResolver {
    secret: String,
}

impl IdentityResolver {
    pub fn new(secret: ServerSecret) -> Self {
        Self {
            secret: secret.into_inner(),
        }
    }

    /// Derives the identity of `network_address` for the UTC day of `now`.
    ///
    /// The address is hashed as opaque bytes; it is never parsed.
    pub fn resolve(&self, network_address: &str, now: SystemTime) -> IdentityHash {
        let salt = self.day_salt(now);

        let mut hasher = blake3::Hasher::new();
        hasher.update(network_address.as_bytes());
        hasher.update(salt.to_hex().as_bytes());
        IdentityHash::from_hash(hasher.finalize())
    }

    fn day_salt(&self, now: SystemTime) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(utc_date(now).as_bytes());
        hasher.update(self.secret.as_bytes());
        hasher.finalize()
    }
}

/// `YYYY-MM-DD` of `now` in UTC.
pub(crate) fn utc_date(now: SystemTime) -> String {
    DateTime::<Utc>::from(now).format("%Y-%m-%d").to_string()
}
