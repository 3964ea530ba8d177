use crate::types::{DeviceToken, IdentityHash, Word};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use super::RecordVariant;

#[cfg_attr(test, derive(PartialEq))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub word: Word,
    pub identity_hash: IdentityHash,
    pub device_token: Option<DeviceToken>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub expires_at: SystemTime,
}

impl RecordVariant for Record {
    const VERSION: u8 = 1;
}
