use crate::config::EngineConfig;

use super::{MemoryTaskStore, SqliteTaskStore, TaskSettings, TaskStore};
use crate::security::TokenSource;

use std::path::Path;
use std::sync::Arc;

pub async fn create_task_store(
    config: &EngineConfig,
    workspace_dir: &Path,
    ids: Arc<dyn TokenSource>,
) -> anyhow::Result<Arc<dyn TaskStore>> {
    let settings = TaskSettings {
        max_steps: config.max_steps,
        id_length: config.id_length,
    };
    let store: Arc<dyn TaskStore> = match config.store.as_str() {
        "sqlite" => Arc::new(SqliteTaskStore::new(workspace_dir, ids, settings).await?),
        "memory" => Arc::new(MemoryTaskStore::new(ids, settings)),
        other => {
            tracing::warn!("Unknown task store '{other}', falling back to memory");
            Arc::new(MemoryTaskStore::new(ids, settings))
        }
    };
    Ok(store)
}
