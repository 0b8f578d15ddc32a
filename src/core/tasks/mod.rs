pub mod factory;
mod sqlite;
mod store;
mod types;

pub use factory::create_task_store;
pub use sqlite::SqliteTaskStore;
pub use store::{MAX_ID_ATTEMPTS, MemoryTaskStore, TaskStore};
pub use types::{DEFAULT_ID_LENGTH, DEFAULT_MAX_STEPS, TaskRecord, TaskSettings, TaskState};
