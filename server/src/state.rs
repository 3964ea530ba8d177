use std::{sync::Arc, time::Duration};

use worldfeel_core::types::Config;
use worldfeel_core::{Coordinator, Vocabulary};

use crate::{config::Settings, error::StartupError};

pub struct State {
    pub coordinator: Coordinator,
    pub purge_interval: Duration,
}

impl State {
    pub fn new(settings: Settings) -> Result<Arc<Self>, StartupError> {
        let Settings { app, secret } = settings;

        let vocabulary = Vocabulary::builtin().with_extra_words(app.vocabulary.extra_words.clone())?;
        let config = Config {
            base_path: app.storage.data_dir.clone(),
            windows: (&app.lifecycle).into(),
        };

        let coordinator = Coordinator::open(config, secret, vocabulary)?;

        Ok(Arc::new(Self {
            coordinator,
            purge_interval: Duration::from_secs(u64::from(app.lifecycle.purge_interval_secs)),
        }))
    }
}
