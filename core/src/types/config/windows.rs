use super::LifecycleConfig;
use std::time::Duration;

/// Time windows governing record lifetime, editing and cache freshness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Windows {
    /// Lifetime of a record; `expires_at = created_at + retention`.
    pub retention: Duration,
    /// Period after creation during which a resubmission edits in place.
    pub edit_window: Duration,
    pub cache_ttl: Duration,
}

impl Default for Windows {
    fn default() -> Self {
        Self::from(&LifecycleConfig::default())
    }
}

impl From<&LifecycleConfig> for Windows {
    fn from(config: &LifecycleConfig) -> Self {
        Self {
            retention: Duration::from_secs(config.retention_hours as u64 * 60 * 60),
            edit_window: Duration::from_secs(config.edit_window_minutes as u64 * 60),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs as u64),
        }
    }
}
