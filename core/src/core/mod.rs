//! Submission coordinator tying the store, identity, vocabulary and cache
//! together. It is the only writer of the record store.

use crate::core::aggregate::aggregate;
use crate::core::cache::{CacheKey, ResultCache};
use crate::core::db::{Claim, ClaimOutcome, Store};
use crate::core::identity::IdentityResolver;
use crate::core::vocabulary::{BlockList, ProfanityFilter, Vocabulary, palette};
use crate::types::{
    AggregateResult, Config, DeviceToken, Record, RecordId, ServerSecret, Windows, Word,
};
use error::{CoreError, ValidationError};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

pub mod aggregate;
pub mod cache;
pub(crate) mod db;
pub mod identity;
pub mod vocabulary;

pub mod error {
    pub use crate::core::db::error::StoreError;
    use crate::types::{DeviceTokenError, WordError};
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum CoreError {
        #[error("Validation error: {0}")]
        Validation(#[from] ValidationError),

        #[error("Store error: {0}")]
        Store(#[from] StoreError),
    }

    /// Rejections that happen before the store is touched.
    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("Invalid word: {0}")]
        Malformed(#[from] WordError),

        #[error("'{0}' is not a recognized emotion")]
        NotInVocabulary(String),

        #[error("Word is not allowed")]
        Profane,

        #[error("Invalid device id: {0}")]
        DeviceToken(#[from] DeviceTokenError),
    }
}

#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub word: String,
    pub network_address: String,
    pub device_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created {
        record: Record,
    },
    Updated {
        record: Record,
        previous_word: Word,
    },
    /// The caller already has a record outside its edit window.
    Conflict {
        existing: Record,
    },
}

impl SubmitOutcome {
    /// The record the caller's identity currently holds.
    pub fn record(&self) -> &Record {
        match self {
            Self::Created { record } | Self::Updated { record, .. } => record,
            Self::Conflict { existing } => existing,
        }
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Conflict { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub outcome: SubmitOutcome,
    /// Aggregate with the caller's word as focus.
    pub aggregate: AggregateResult,
    pub device_token: DeviceToken,
    /// True if `device_token` was generated for this request, bound to the
    /// caller's record, and should be persisted. Never set on a conflict.
    pub device_token_issued: bool,
    /// `None` once the record can no longer be edited.
    pub edit_window_remaining: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct StatsQuery {
    pub your_word: Option<String>,
    pub device_token: Option<String>,
}

#[derive(Debug, Default)]
pub struct MaintenanceOutcome {
    pub records_purged: Vec<RecordId>,
    pub cache_entries_swept: usize,
}

pub struct Coordinator {
    store: Store,
    identity: IdentityResolver,
    vocabulary: Vocabulary,
    profanity: Box<dyn ProfanityFilter>,
    cache: ResultCache,
    windows: Windows,
}

impl Coordinator {
    pub fn open(
        config: Config,
        secret: ServerSecret,
        vocabulary: Vocabulary,
    ) -> Result<Self, CoreError> {
        let store = Store::open(&config)?;
        Ok(Self {
            store,
            identity: IdentityResolver::new(secret),
            vocabulary,
            profanity: Box::new(BlockList::default()),
            cache: ResultCache::new(config.windows.cache_ttl),
            windows: config.windows,
        })
    }

    pub fn with_profanity_filter(mut self, filter: impl ProfanityFilter + 'static) -> Self {
        self.profanity = Box::new(filter);
        self
    }

    pub fn windows(&self) -> Windows {
        self.windows
    }
}

/// Write path.
impl Coordinator {
    /// Validates the word, resolves the caller and applies the edit-window
    /// policy. A conflict is an outcome, not an error.
    pub fn submit(&self, request: SubmitRequest, now: SystemTime) -> Result<Submission, CoreError> {
        let word = self.vocabulary.resolve(&request.word)?;
        if self.profanity.is_profane(&word) {
            return Err(ValidationError::Profane.into());
        }

        let presented = request
            .device_token
            .map(DeviceToken::try_new)
            .transpose()
            .map_err(ValidationError::from)?;
        let generated = presented.is_none();
        let device_token = presented.unwrap_or_else(DeviceToken::generate);

        let identity_hash = self.identity.resolve(&request.network_address, now);
        let identity_short = identity_hash.short().to_string();

        let claimed = self.store.claim(
            Claim {
                word,
                identity_hash,
                device_token: Some(device_token.clone()),
            },
            self.windows,
            now,
        )?;

        let (outcome, edit_window_remaining) = match claimed {
            ClaimOutcome::Created(record) => {
                debug!(identity = %identity_short, id = record.id, word = %record.word, "Submission created");
                self.cache.invalidate_all();
                (SubmitOutcome::Created { record }, Some(self.windows.edit_window))
            }
            ClaimOutcome::Updated {
                record,
                previous_word,
            } => {
                debug!(
                    identity = %identity_short,
                    id = record.id,
                    from = %previous_word,
                    to = %record.word,
                    "Submission edited"
                );
                self.cache.invalidate_all();
                let remaining = self.windows.edit_window.saturating_sub(record.age(now));
                (
                    SubmitOutcome::Updated {
                        record,
                        previous_word,
                    },
                    Some(remaining),
                )
            }
            ClaimOutcome::Locked(existing) => {
                debug!(identity = %identity_short, id = existing.id, "Submission outside edit window");
                (SubmitOutcome::Conflict { existing }, None)
            }
        };

        let key = CacheKey {
            focus: Some(outcome.record().word.clone()),
            device: Some(device_token.clone()),
        };
        let focus = outcome.record().word.clone();
        let aggregate = self.cached_aggregate(key, Some(&focus), now)?;

        // A conflict writes nothing, so a generated token is bound to no record.
        let device_token_issued = generated && outcome.is_editable();

        Ok(Submission {
            outcome,
            aggregate,
            device_token,
            device_token_issued,
            edit_window_remaining,
        })
    }
}

/// Read path.
impl Coordinator {
    /// Aggregate for a stats request. Without an explicit word, the device's
    /// latest active record supplies the focus.
    pub fn stats(&self, query: StatsQuery, now: SystemTime) -> Result<AggregateResult, CoreError> {
        let focus = query
            .your_word
            .as_deref()
            .map(|raw| self.vocabulary.normalize(raw))
            .transpose()?;
        let device = query
            .device_token
            .map(DeviceToken::try_new)
            .transpose()
            .map_err(ValidationError::from)?;

        let key = CacheKey {
            focus: focus.clone(),
            device: device.clone(),
        };
        if let Some(hit) = self.cache.get(&key, now) {
            return Ok(hit);
        }

        let focus = match (focus, &device) {
            (Some(word), _) => Some(word),
            (None, Some(device)) => self
                .store
                .latest_active_for(None, Some(device), now)?
                .map(|record| record.word),
            (None, None) => None,
        };

        self.cached_aggregate(key, focus.as_ref(), now)
    }

    /// Words that reached the top without a palette color, most seen first.
    pub fn unknown_words(&self) -> Result<Vec<(String, u64)>, CoreError> {
        Ok(self.store.unknown_words()?)
    }

    fn cached_aggregate(
        &self,
        key: CacheKey,
        focus: Option<&Word>,
        now: SystemTime,
    ) -> Result<AggregateResult, CoreError> {
        if let Some(hit) = self.cache.get(&key, now) {
            return Ok(hit);
        }

        let generation = self.cache.generation();
        let records = self.store.active_records(now)?;
        let result = aggregate(&records, focus);
        self.note_unknown_top(&result.top.word);

        if !self.cache.set_if_current(key, result.clone(), now, generation) {
            debug!("Skipped caching a result computed before a write");
        }
        Ok(result)
    }

    /// Best effort: failures are logged and dropped.
    fn note_unknown_top(&self, word: &Word) {
        if word.is_silence() || palette::color_for(word).is_some() {
            return;
        }

        warn!(word = %word, "Top word has no palette color");
        if let Err(e) = self.store.record_unknown_word(word) {
            warn!(word = %word, error = %e, "Failed to record unknown word");
        }
    }
}

/// Maintenance.
impl Coordinator {
    /// Returns true if maintenance should run (never run or interval elapsed).
    pub fn should_run_maintenance(&self, now: SystemTime, interval: Duration) -> bool {
        self.store.should_run_maintenance(now, interval)
    }

    /// Purges expired records and sweeps stale cache entries.
    pub fn maintenance(&self, now: SystemTime) -> Result<MaintenanceOutcome, CoreError> {
        let records_purged = self.store.purge_expired(now)?;
        let cache_entries_swept = self.cache.sweep(now);

        if !records_purged.is_empty() {
            info!(count = records_purged.len(), "Purged expired records");
        }

        Ok(MaintenanceOutcome {
            records_purged,
            cache_entries_swept,
        })
    }
}
