use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
pub struct DeviceSettings {
    pub base_url: String,
    pub snapshot_path: String,
    pub timeout_secs: u64,
}

impl DeviceSettings {
    pub fn snapshot_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.snapshot_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
