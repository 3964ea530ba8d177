mod app;
mod core;
mod windows;

pub use app::{
    AppConfig, AppConfigError, IdentityConfig, LifecycleConfig, ServerConfig, StorageConfig,
    VocabularyConfig,
};
pub use self::core::Config;
pub use windows::Windows;
