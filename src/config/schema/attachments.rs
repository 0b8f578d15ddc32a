use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentConfig {
    /// Deadline for downloading one attachment (default: 15s)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Largest accepted attachment (default: 20 MiB)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_max_bytes() -> usize {
    20 * 1024 * 1024
}

impl AttachmentConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_bytes: default_max_bytes(),
        }
    }
}
