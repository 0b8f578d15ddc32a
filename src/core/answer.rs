//! Step-wise answer generation.
//!
//! The reasoning itself is a deterministic stand-in: the text for a task is a
//! pure function of `(question, current_step)`, so repeated polls at the same
//! step always render the same answer.

use std::fmt::Write as _;
use std::sync::Arc;

use super::tasks::{TaskRecord, TaskStore};
use crate::error::TaskError;

/// Shown when a polled stream id has no task behind it.
pub const EXPIRED_ANSWER: &str = "Task not found or expired.";

/// One rendered chunk of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub stream_id: String,
    pub content: String,
    pub finish: bool,
}

/// Render the answer text for a task at its current step.
pub fn render_answer(record: &TaskRecord) -> String {
    let mut out = format!("Received question: {}\n", record.question);
    for step in 0..record.current_step {
        let _ = writeln!(out, "Processing step {step}: completed");
    }
    out
}

pub struct AnswerEngine {
    store: Arc<dyn TaskStore>,
}

impl AnswerEngine {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Open a task for `question` and render its first step.
    pub async fn start(&self, question: &str) -> Result<Answer, TaskError> {
        let record = self.store.create(question).await?;
        tracing::info!(stream_id = %record.id, max_steps = record.max_steps, "task created");
        self.poll(&record.id).await
    }

    /// Advance stream `id` one step and render it.
    ///
    /// Unknown ids produce a finished "expired" answer instead of an error.
    pub async fn poll(&self, id: &str) -> Result<Answer, TaskError> {
        match self.store.advance(id).await {
            Ok(record) => {
                tracing::debug!(
                    stream_id = %record.id,
                    step = record.current_step,
                    max_steps = record.max_steps,
                    "task advanced"
                );
                Ok(Answer {
                    content: render_answer(&record),
                    finish: record.is_finished(),
                    stream_id: record.id,
                })
            }
            Err(TaskError::NotFound(_)) => {
                tracing::warn!(stream_id = id, "poll for unknown task");
                Ok(Answer {
                    stream_id: id.to_string(),
                    content: EXPIRED_ANSWER.to_string(),
                    finish: true,
                })
            }
            Err(err) => Err(err),
        }
    }
}
