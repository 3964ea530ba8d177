use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use tracing::{info, warn};
use worldfeel_core::types::{AppConfig, ServerSecret};

use crate::error::StartupError;

const CONFIG_PATH_VAR: &str = "WORLDFEEL_CONFIG";
const SECRET_NAME: &str = "WORLDFEEL_SECRET";

/// Everything the server needs at startup.
pub struct Settings {
    pub app: AppConfig,
    pub secret: ServerSecret,
}

impl Settings {
    pub fn load() -> Result<Self, StartupError> {
        let path = config_path();
        info!("Loading config from {}", path.display());

        let loaded = AppConfig::load(&path)?;
        let problems = loaded.validate();
        for problem in &problems {
            warn!("Invalid config value, using default: {problem}");
        }
        let app = if problems.is_empty() {
            loaded
        } else {
            loaded.with_defaults_for_invalid()
        };

        let secret = load_secret(&app)?;
        Ok(Self { app, secret })
    }
}

fn config_path() -> PathBuf {
    env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| AppConfig::path(Path::new(".")))
}

/// Secret precedence: environment, then `/run/secrets`, then the config file.
fn load_secret(app: &AppConfig) -> Result<ServerSecret, StartupError> {
    let raw = env::var(SECRET_NAME)
        .ok()
        .or_else(|| read_secret(SECRET_NAME))
        .or_else(|| app.identity.secret.clone())
        .ok_or(StartupError::MissingSecret)?;

    Ok(ServerSecret::try_new(raw.trim().to_string())?)
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No secret file for {secret_name}: {e}");
        })
        .ok()
}
