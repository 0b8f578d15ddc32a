use serde::{Deserialize, Serialize};

use crate::core::tasks::{DEFAULT_ID_LENGTH, DEFAULT_MAX_STEPS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Polls needed before an answer is finished (default: 10)
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    /// Length of generated stream ids (default: 10)
    #[serde(default = "default_id_length")]
    pub id_length: usize,
    /// "memory" | "sqlite"
    #[serde(default = "default_store")]
    pub store: String,
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

fn default_id_length() -> usize {
    DEFAULT_ID_LENGTH
}

fn default_store() -> String {
    "memory".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            id_length: default_id_length(),
            store: default_store(),
        }
    }
}
