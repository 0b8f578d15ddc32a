use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::types::{TaskRecord, TaskSettings};
use crate::error::TaskError;
use crate::security::TokenSource;

/// Bound on id allocation retries before giving up.
pub const MAX_ID_ATTEMPTS: u32 = 32;

/// Keyed record of in-flight answer tasks.
///
/// `advance` must be a single atomic read-modify-write per id: the platform
/// may poll the same stream concurrently.
#[async_trait]
pub trait TaskStore: Send + Sync {
    fn name(&self) -> &str;

    async fn health_check(&self) -> bool {
        true
    }

    /// Allocate a fresh id and persist a record at step 0.
    async fn create(&self, question: &str) -> Result<TaskRecord, TaskError>;

    /// Increment the step (saturating) and return the updated snapshot.
    async fn advance(&self, id: &str) -> Result<TaskRecord, TaskError>;

    async fn get(&self, id: &str) -> Result<Option<TaskRecord>, TaskError>;

    /// Absent tasks count as finished.
    async fn is_finished(&self, id: &str) -> Result<bool, TaskError> {
        Ok(self
            .get(id)
            .await?
            .is_none_or(|record| record.is_finished()))
    }
}

/// Process-local store. Every operation runs inside one critical section.
pub struct MemoryTaskStore {
    tasks: Mutex<HashMap<String, TaskRecord>>,
    ids: Arc<dyn TokenSource>,
    settings: TaskSettings,
}

impl MemoryTaskStore {
    pub fn new(ids: Arc<dyn TokenSource>, settings: TaskSettings) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            ids,
            settings,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, TaskRecord>> {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create(&self, question: &str) -> Result<TaskRecord, TaskError> {
        let mut tasks = self.lock();
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = self.ids.next_token(self.settings.id_length);
            if tasks.contains_key(&id) {
                tracing::debug!(attempt, "task id collision, retrying");
                continue;
            }
            let record = TaskRecord::new(id.clone(), question, self.settings.max_steps);
            tasks.insert(id, record.clone());
            return Ok(record);
        }
        Err(TaskError::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    async fn advance(&self, id: &str) -> Result<TaskRecord, TaskError> {
        let mut tasks = self.lock();
        let record = tasks
            .get_mut(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        record.advance();
        Ok(record.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<TaskRecord>, TaskError> {
        Ok(self.lock().get(id).cloned())
    }
}
