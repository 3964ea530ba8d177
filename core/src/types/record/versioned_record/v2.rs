use crate::types::{DeviceToken, IdentityHash, Word};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use super::{RecordVariant, v1};

#[cfg_attr(test, derive(PartialEq))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub word: Word,
    pub identity_hash: IdentityHash,
    pub device_token: Option<DeviceToken>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub expires_at: SystemTime,
    /// Extra identity hashes that were pointed at this record by edits.
    pub identity_aliases: Vec<IdentityHash>,
    /// Extra device tokens that were pointed at this record by edits.
    pub device_aliases: Vec<DeviceToken>,
}

impl RecordVariant for Record {
    const VERSION: u8 = 2;
}

impl Record {
    /// Every identity index key that may point at this record.
    pub fn identity_keys(&self) -> impl Iterator<Item = &IdentityHash> {
        std::iter::once(&self.identity_hash).chain(&self.identity_aliases)
    }

    /// Every device index key that may point at this record.
    pub fn device_keys(&self) -> impl Iterator<Item = &DeviceToken> {
        self.device_token.iter().chain(&self.device_aliases)
    }

    /// Remembers an index key so the purge pass can clean it up.
    pub fn add_identity_alias(&mut self, hash: &IdentityHash) {
        if !self.identity_keys().any(|known| known == hash) {
            self.identity_aliases.push(hash.clone());
        }
    }

    pub fn add_device_alias(&mut self, token: &DeviceToken) {
        if !self.device_keys().any(|known| known == token) {
            self.device_aliases.push(token.clone());
        }
    }
}

impl From<v1::Record> for Record {
    fn from(v1: v1::Record) -> Self {
        Self {
            word: v1.word,
            identity_hash: v1.identity_hash,
            device_token: v1.device_token,
            created_at: v1.created_at,
            updated_at: v1.updated_at,
            expires_at: v1.expires_at,
            identity_aliases: Vec::new(),
            device_aliases: Vec::new(),
        }
    }
}
