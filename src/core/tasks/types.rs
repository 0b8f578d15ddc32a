use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Defaults used when a store is built without explicit settings.
pub const DEFAULT_MAX_STEPS: u32 = 10;
pub const DEFAULT_ID_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Created,
    InProgress,
    Finished,
}

/// Snapshot of one answer task. Stores hand out copies, never references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub question: String,
    pub created_at: DateTime<Utc>,
    pub current_step: u32,
    pub max_steps: u32,
}

impl TaskRecord {
    pub fn new(id: String, question: &str, max_steps: u32) -> Self {
        Self {
            id,
            question: question.to_string(),
            created_at: Utc::now(),
            current_step: 0,
            max_steps,
        }
    }

    pub fn state(&self) -> TaskState {
        if self.current_step >= self.max_steps {
            TaskState::Finished
        } else if self.current_step == 0 {
            TaskState::Created
        } else {
            TaskState::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == TaskState::Finished
    }

    /// Step forward once, saturating at `max_steps`.
    pub fn advance(&mut self) {
        self.current_step = self.current_step.saturating_add(1).min(self.max_steps);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSettings {
    pub max_steps: u32,
    pub id_length: usize,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            id_length: DEFAULT_ID_LENGTH,
        }
    }
}
