//! Record store backed by redb.
//!
//! Tables:
//! - `records`: RecordId → VersionedRecord
//! - `expiry`: (expires_at, RecordId) → (), ordered, drives purging
//! - `by_identity` / `by_device`: lookup key → most recent RecordId
//! - `sequences`: name → next id
//! - `unknown_words`: word → sightings, curation side channel
//! - `metadata`: &str → JSON string
//!
//! Expired records are never returned by reads, whether or not the purge pass
//! has physically removed them yet.

use crate::core::db::error::StoreError;
use crate::core::db::expiry_table::ExpiryTable;
use crate::types::metadata::MaintenanceMetadata;
use crate::types::record::versioned_record::VersionedRecord;
use crate::types::record::versioned_record::latest_record;
use crate::types::{Config, DeviceToken, ExpiryKey, IdentityHash, Record, RecordId, Windows, Word};
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::time::{Duration, SystemTime};

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StoreError {
        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("Metadata error: {0}")]
        Metadata(#[from] serde_json::Error),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }
}

mod expiry_table;

const RECORDS: TableDefinition<RecordId, VersionedRecord> = TableDefinition::new("records");

const BY_IDENTITY: TableDefinition<&str, RecordId> = TableDefinition::new("by_identity");

const BY_DEVICE: TableDefinition<&str, RecordId> = TableDefinition::new("by_device");

const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const SEQUENCE_RECORD_ID: &str = "record_id";

const UNKNOWN_WORDS: TableDefinition<&str, u64> = TableDefinition::new("unknown_words");

const METADATA_TABLE: TableDefinition<&str, &str> = TableDefinition::new("metadata");

const METADATA_KEY_MAINTENANCE: &str = "maintenance";

const EXPIRY: ExpiryTable = ExpiryTable::new("expiry");

pub struct Store {
    db: redb::Database,
}

/// What the caller wants written for its identity.
#[derive(Debug, Clone)]
pub struct Claim {
    pub word: Word,
    pub identity_hash: IdentityHash,
    pub device_token: Option<DeviceToken>,
}

/// Result of the lookup-then-write state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// No active record existed; a new one was written.
    Created(Record),
    /// An active record inside the edit window was rewritten in place.
    Updated { record: Record, previous_word: Word },
    /// An active record outside the edit window exists; nothing was written.
    Locked(Record),
}

impl Store {
    /// Creates or opens a store using paths from the config.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RECORDS)?;
            let _ = write_txn.open_table(BY_IDENTITY)?;
            let _ = write_txn.open_table(BY_DEVICE)?;
            let _ = write_txn.open_table(SEQUENCES)?;
            let _ = write_txn.open_table(UNKNOWN_WORDS)?;
            let _ = write_txn.open_table(METADATA_TABLE)?;
            EXPIRY.init(&write_txn)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

/// Write operations.
impl Store {
    /// Looks up the caller's latest active record and applies the edit-window
    /// policy, all inside one write transaction.
    ///
    /// redb admits a single writer at a time, so two concurrent claims for the
    /// same identity are serialized: the second one sees the first record.
    pub fn claim(
        &self,
        claim: Claim,
        windows: Windows,
        now: SystemTime,
    ) -> Result<ClaimOutcome, StoreError> {
        let write_txn = self.db.begin_write()?;

        let outcome = {
            let mut records = write_txn.open_table(RECORDS)?;
            let mut by_identity = write_txn.open_table(BY_IDENTITY)?;
            let mut by_device = write_txn.open_table(BY_DEVICE)?;

            let existing = Self::latest_active(
                &records,
                &by_identity,
                &by_device,
                Some(&claim.identity_hash),
                claim.device_token.as_ref(),
                now,
            )?;

            match existing {
                None => {
                    let id = Self::next_record_id(&write_txn)?;
                    let stored = latest_record::Record {
                        word: claim.word,
                        identity_hash: claim.identity_hash,
                        device_token: claim.device_token,
                        created_at: now,
                        updated_at: now,
                        expires_at: now + windows.retention,
                        identity_aliases: Vec::new(),
                        device_aliases: Vec::new(),
                    };

                    records.insert(id, &VersionedRecord::V2(stored.clone()))?;
                    EXPIRY.insert(
                        &write_txn,
                        &ExpiryKey {
                            expires_at: stored.expires_at,
                            id,
                        },
                    )?;

                    let record = Record::from_latest_record(id, stored);
                    Self::index(&mut by_identity, &mut by_device, &record, &record.identity_hash)?;
                    ClaimOutcome::Created(record)
                }
                Some(record) if record.age(now) <= windows.edit_window => {
                    let mut stored = match records.get(record.id)? {
                        Some(guard) => guard.value().into_latest(),
                        None => record.to_latest_record(),
                    };

                    let previous_word = std::mem::replace(&mut stored.word, claim.word);
                    stored.updated_at = now;

                    // The caller may have matched through only one of its keys (new
                    // address, new day, new device); make both reach this record and
                    // remember them so the purge pass can drop them.
                    stored.add_identity_alias(&claim.identity_hash);
                    by_identity.insert(claim.identity_hash.as_str(), record.id)?;
                    if let Some(token) = &claim.device_token {
                        if stored.device_token.is_none() {
                            stored.device_token = Some(token.clone());
                        } else {
                            stored.add_device_alias(token);
                        }
                        by_device.insert(token.as_str(), record.id)?;
                    }

                    records.insert(record.id, &VersionedRecord::V2(stored.clone()))?;

                    ClaimOutcome::Updated {
                        record: Record::from_latest_record(record.id, stored),
                        previous_word,
                    }
                }
                Some(record) => ClaimOutcome::Locked(record),
            }
        };

        if matches!(outcome, ClaimOutcome::Locked(_)) {
            write_txn.abort()?;
        } else {
            write_txn.commit()?;
        }
        Ok(outcome)
    }

    /// Counts a sighting of a word that has no palette entry.
    ///
    /// Returns the total number of sightings so far.
    pub fn record_unknown_word(&self, word: &Word) -> Result<u64, StoreError> {
        let write_txn = self.db.begin_write()?;
        let sightings;
        {
            let mut table = write_txn.open_table(UNKNOWN_WORDS)?;
            let previous = table.get(word.as_str())?.map(|g| g.value()).unwrap_or(0);
            sightings = previous + 1;
            table.insert(word.as_str(), sightings)?;
        }
        write_txn.commit()?;
        Ok(sightings)
    }
}

/// Read operations.
impl Store {
    /// Returns every record whose `expires_at` is still in the future.
    pub fn active_records(&self, now: SystemTime) -> Result<Vec<Record>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS)?;

        let mut active = Vec::new();
        for entry in table.iter()? {
            let (id, stored) = entry?;
            let record = Record::from_latest_record(id.value(), stored.value().into_latest());
            if record.is_active(now) {
                active.push(record);
            }
        }

        Ok(active)
    }

    /// Finds the most recent active record reachable by either key.
    pub fn latest_active_for(
        &self,
        identity_hash: Option<&IdentityHash>,
        device_token: Option<&DeviceToken>,
        now: SystemTime,
    ) -> Result<Option<Record>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let records = read_txn.open_table(RECORDS)?;
        let by_identity = read_txn.open_table(BY_IDENTITY)?;
        let by_device = read_txn.open_table(BY_DEVICE)?;

        Self::latest_active(
            &records,
            &by_identity,
            &by_device,
            identity_hash,
            device_token,
            now,
        )
    }

    /// Retrieves a record by id, regardless of expiry.
    #[cfg(test)]
    pub fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS)?;

        Ok(table
            .get(id)?
            .map(|guard| Record::from_latest_record(id, guard.value().into_latest())))
    }

    /// Number of entries in the identity and device indexes.
    #[cfg(test)]
    pub fn index_sizes(&self) -> Result<(u64, u64), StoreError> {
        use redb::ReadableTableMetadata;

        let read_txn = self.db.begin_read()?;
        let by_identity = read_txn.open_table(BY_IDENTITY)?;
        let by_device = read_txn.open_table(BY_DEVICE)?;
        Ok((by_identity.len()?, by_device.len()?))
    }

    /// Words without a palette entry, most sighted first.
    pub fn unknown_words(&self) -> Result<Vec<(String, u64)>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(UNKNOWN_WORDS)?;

        let mut words = Vec::new();
        for entry in table.iter()? {
            let (word, sightings) = entry?;
            words.push((word.value().to_string(), sightings.value()));
        }
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(words)
    }
}

/// Maintenance operations.
impl Store {
    /// Physically deletes records whose `expires_at <= now`, along with their
    /// index entries, and updates the last-run timestamp.
    ///
    /// Returns the ids of the deleted records.
    pub fn purge_expired(&self, now: SystemTime) -> Result<Vec<RecordId>, StoreError> {
        let due = {
            let read_txn = self.db.begin_read()?;
            EXPIRY.expired(&read_txn, now)?
        };

        if due.is_empty() {
            self.set_maintenance_metadata(&MaintenanceMetadata {
                last_run_at: Some(now),
            })?;
            return Ok(Vec::new());
        }

        let write_txn = self.db.begin_write()?;
        let mut purged = Vec::with_capacity(due.len());

        {
            let mut records = write_txn.open_table(RECORDS)?;
            let mut by_identity = write_txn.open_table(BY_IDENTITY)?;
            let mut by_device = write_txn.open_table(BY_DEVICE)?;

            for key in due {
                EXPIRY.remove(&write_txn, &key)?;

                let Some(stored) = records
                    .remove(key.id)?
                    .map(|guard| guard.value().into_latest())
                else {
                    continue;
                };

                for hash in stored.identity_keys() {
                    let points_here = by_identity
                        .get(hash.as_str())?
                        .is_some_and(|guard| guard.value() == key.id);
                    if points_here {
                        by_identity.remove(hash.as_str())?;
                    }
                }

                for token in stored.device_keys() {
                    let points_here = by_device
                        .get(token.as_str())?
                        .is_some_and(|guard| guard.value() == key.id);
                    if points_here {
                        by_device.remove(token.as_str())?;
                    }
                }

                purged.push(key.id);
            }

            let json = serde_json::to_string(&MaintenanceMetadata {
                last_run_at: Some(now),
            })?;
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            meta_table.insert(METADATA_KEY_MAINTENANCE, json.as_str())?;
        }

        write_txn.commit()?;
        Ok(purged)
    }

    /// Returns true if maintenance should run (never run or interval elapsed).
    pub fn should_run_maintenance(&self, now: SystemTime, interval: Duration) -> bool {
        match self.last_maintenance_at() {
            None => true,
            Some(last) => now.duration_since(last).map(|d| d >= interval).unwrap_or(true),
        }
    }
}

/// Internal helpers.
impl Store {
    fn latest_active(
        records: &impl ReadableTable<RecordId, VersionedRecord>,
        by_identity: &impl ReadableTable<&'static str, RecordId>,
        by_device: &impl ReadableTable<&'static str, RecordId>,
        identity_hash: Option<&IdentityHash>,
        device_token: Option<&DeviceToken>,
        now: SystemTime,
    ) -> Result<Option<Record>, StoreError> {
        let mut candidates = Vec::with_capacity(2);

        if let Some(hash) = identity_hash
            && let Some(guard) = by_identity.get(hash.as_str())?
        {
            candidates.push(guard.value());
        }

        if let Some(token) = device_token
            && let Some(guard) = by_device.get(token.as_str())?
        {
            candidates.push(guard.value());
        }

        let mut latest: Option<Record> = None;
        for id in candidates {
            let Some(guard) = records.get(id)? else {
                continue;
            };
            let record = Record::from_latest_record(id, guard.value().into_latest());
            if !record.is_active(now) {
                continue;
            }

            let newer = latest
                .as_ref()
                .is_none_or(|current| (record.created_at, record.id) > (current.created_at, current.id));
            if newer {
                latest = Some(record);
            }
        }

        Ok(latest)
    }

    fn index(
        by_identity: &mut redb::Table<'_, &'static str, RecordId>,
        by_device: &mut redb::Table<'_, &'static str, RecordId>,
        record: &Record,
        identity_hash: &IdentityHash,
    ) -> Result<(), StoreError> {
        by_identity.insert(identity_hash.as_str(), record.id)?;
        if let Some(token) = &record.device_token {
            by_device.insert(token.as_str(), record.id)?;
        }
        Ok(())
    }

    fn next_record_id(txn: &redb::WriteTransaction) -> Result<RecordId, StoreError> {
        let mut table = txn.open_table(SEQUENCES)?;
        let next = table
            .get(SEQUENCE_RECORD_ID)?
            .map(|guard| guard.value())
            .unwrap_or(1);
        table.insert(SEQUENCE_RECORD_ID, next + 1)?;
        Ok(next)
    }
}

/// Metadata operations.
impl Store {
    fn get_maintenance_metadata(&self) -> Option<MaintenanceMetadata> {
        let read_txn = self.db.begin_read().ok()?;
        let table = read_txn.open_table(METADATA_TABLE).ok()?;
        let guard = table.get(METADATA_KEY_MAINTENANCE).ok()??;
        serde_json::from_str(guard.value()).ok()
    }

    fn set_maintenance_metadata(&self, metadata: &MaintenanceMetadata) -> Result<(), StoreError> {
        let json = serde_json::to_string(metadata)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(METADATA_TABLE)?;
            table.insert(METADATA_KEY_MAINTENANCE, json.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn last_maintenance_at(&self) -> Option<SystemTime> {
        self.get_maintenance_metadata()?.last_run_at
    }
}

#[cfg(test)]
mod tests;
