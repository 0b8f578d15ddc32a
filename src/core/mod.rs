pub mod answer;
pub mod tasks;

pub use answer::{Answer, AnswerEngine, EXPIRED_ANSWER, render_answer};
pub use tasks::{MemoryTaskStore, SqliteTaskStore, TaskRecord, TaskSettings, TaskState, TaskStore};
