//! Identity tokens binding a submission to its requester.

use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const MAX_DEVICE_TOKEN_LENGTH: usize = 128;
pub const MIN_SECRET_LENGTH: usize = 32;

/// Opaque client-held token, more stable than the network-derived identity.
#[nutype(
    new_unchecked,
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_DEVICE_TOKEN_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Issues a fresh random token for a caller that did not present one.
    pub fn generate() -> Self {
        // SAFETY: a hyphenated UUID is 36 ASCII characters without surrounding whitespace.
        unsafe { Self::new_unchecked(Uuid::new_v4().to_string()) }
    }
}

/// Long-lived server secret mixed into the daily identity salt.
///
/// Deliberately has no `Debug` or `Display` so it cannot end up in logs.
#[nutype(validate(len_char_min = MIN_SECRET_LENGTH), derive(Clone, TryFrom))]
pub struct ServerSecret(String);

/// Hex-encoded blake3 digest identifying "the same requester, today".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityHash(String);

impl IdentityHash {
    pub(crate) fn from_hash(hash: blake3::Hash) -> Self {
        Self(hash.to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix that is safe to put in logs.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
