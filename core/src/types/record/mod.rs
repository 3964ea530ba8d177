//! Public record type for consumers.
//!
//! The stored representation lives in `versioned_record`; `Record` adds the
//! store-assigned id and lifecycle helpers.

use crate::types::{DeviceToken, IdentityHash, Word};
use std::time::{Duration, SystemTime};

pub(crate) mod versioned_record;

use versioned_record::latest_record;

pub type RecordId = u64;

/// A submission as seen by the rest of the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub word: Word,
    pub identity_hash: IdentityHash,
    pub device_token: Option<DeviceToken>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub expires_at: SystemTime,
}

impl Record {
    pub(crate) fn from_latest_record(id: RecordId, record: latest_record::Record) -> Self {
        Self {
            id,
            word: record.word,
            identity_hash: record.identity_hash,
            device_token: record.device_token,
            created_at: record.created_at,
            updated_at: record.updated_at,
            expires_at: record.expires_at,
        }
    }

    pub(crate) fn to_latest_record(&self) -> latest_record::Record {
        latest_record::Record {
            word: self.word.clone(),
            identity_hash: self.identity_hash.clone(),
            device_token: self.device_token.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            expires_at: self.expires_at,
            identity_aliases: Vec::new(),
            device_aliases: Vec::new(),
        }
    }

    pub fn is_active(&self, now: SystemTime) -> bool {
        self.expires_at > now
    }

    /// Time since creation. A clock that moved backwards reads as zero.
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.created_at).unwrap_or_default()
    }
}
