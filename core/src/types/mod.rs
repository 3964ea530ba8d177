pub(crate) mod aggregate;
pub use aggregate::{AggregateResult, WordCount, YourWord};

pub(crate) mod config;
pub use config::{
    AppConfig, AppConfigError, Config, IdentityConfig, LifecycleConfig, ServerConfig,
    StorageConfig, VocabularyConfig, Windows,
};

pub(crate) mod expiry_key;
pub use expiry_key::ExpiryKey;

pub(crate) mod identity;
pub use identity::{
    DeviceToken, DeviceTokenError, IdentityHash, MAX_DEVICE_TOKEN_LENGTH, MIN_SECRET_LENGTH,
    ServerSecret, ServerSecretError,
};

pub(crate) mod metadata;

pub(crate) mod record;
pub use record::{Record, RecordId};

pub(crate) mod word;
pub use word::{MAX_WORD_LENGTH, SILENCE, Word, WordError};
