use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use worldfeel_core::types::{Config, ServerSecret, Windows};
use worldfeel_core::{Coordinator, SubmitRequest, Vocabulary};

pub const SECRET: &str = "integration-secret-integration-secret";

pub fn open_coordinator() -> (Coordinator, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        base_path: temp_dir.path().to_path_buf(),
        windows: Windows::default(),
    };
    let secret = ServerSecret::try_new(SECRET.to_string()).unwrap();
    let coordinator = Coordinator::open(config, secret, Vocabulary::builtin()).unwrap();
    (coordinator, temp_dir)
}

/// 2023-11-14T22:13:20Z
pub fn epoch() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

pub fn request(word: &str, address: &str, device: Option<&str>) -> SubmitRequest {
    SubmitRequest {
        word: word.to_string(),
        network_address: address.to_string(),
        device_token: device.map(str::to_string),
    }
}
