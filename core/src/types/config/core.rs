use super::Windows;
use std::path::PathBuf;

/// Core configuration for `Coordinator` initialization.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
    pub windows: Windows,
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("worldfeel.redb")
    }
}
