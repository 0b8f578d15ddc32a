use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::store::{MAX_ID_ATTEMPTS, TaskStore};
use super::types::{TaskRecord, TaskSettings};
use crate::error::TaskError;
use crate::security::TokenSource;

type TaskRow = (String, String, String, i64, i64);

/// SQLite-backed task store.
///
/// Steps are advanced with a single `UPDATE .. RETURNING`, so concurrent
/// polls from several connections never lose an increment.
pub struct SqliteTaskStore {
    pool: SqlitePool,
    ids: Arc<dyn TokenSource>,
    settings: TaskSettings,
}

impl SqliteTaskStore {
    /// Open (or create) the database at `<workspace_dir>/tasks/tasks.db`.
    pub async fn new(
        workspace_dir: &Path,
        ids: Arc<dyn TokenSource>,
        settings: TaskSettings,
    ) -> anyhow::Result<Self> {
        let db_path = workspace_dir.join("tasks").join("tasks.db");
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create task store directory")?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .context("open SQLite task store")?;

        init_schema(&pool).await?;

        Ok(Self {
            pool,
            ids,
            settings,
        })
    }
}

async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::raw_sql(
        "CREATE TABLE IF NOT EXISTS tasks (
             id           TEXT PRIMARY KEY,
             question     TEXT NOT NULL,
             created_at   TEXT NOT NULL,
             current_step INTEGER NOT NULL DEFAULT 0,
             max_steps    INTEGER NOT NULL CHECK (max_steps > 0),
             CHECK (current_step >= 0 AND current_step <= max_steps)
         );",
    )
    .execute(pool)
    .await
    .context("initialize task schema")?;
    Ok(())
}

fn record_from_row(row: TaskRow) -> Result<TaskRecord, TaskError> {
    let (id, question, created_at, current_step, max_steps) = row;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| TaskError::Store(format!("bad created_at for {id}: {e}")))?
        .with_timezone(&Utc);
    let current_step = u32::try_from(current_step)
        .map_err(|_| TaskError::Store(format!("bad current_step for {id}")))?;
    let max_steps =
        u32::try_from(max_steps).map_err(|_| TaskError::Store(format!("bad max_steps for {id}")))?;
    Ok(TaskRecord {
        id,
        question,
        created_at,
        current_step,
        max_steps,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    async fn create(&self, question: &str) -> Result<TaskRecord, TaskError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = self.ids.next_token(self.settings.id_length);
            let record = TaskRecord::new(id, question, self.settings.max_steps);
            let inserted = sqlx::query(
                "INSERT OR IGNORE INTO tasks (id, question, created_at, current_step, max_steps)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&record.id)
            .bind(&record.question)
            .bind(record.created_at.to_rfc3339())
            .bind(i64::from(record.current_step))
            .bind(i64::from(record.max_steps))
            .execute(&self.pool)
            .await?
            .rows_affected();
            if inserted == 1 {
                return Ok(record);
            }
            tracing::debug!(attempt, "task id collision, retrying");
        }
        Err(TaskError::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    async fn advance(&self, id: &str) -> Result<TaskRecord, TaskError> {
        let row: Option<TaskRow> = sqlx::query_as(
            "UPDATE tasks
                SET current_step = MIN(current_step + 1, max_steps)
              WHERE id = ?1
          RETURNING id, question, created_at, current_step, max_steps",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map_or_else(|| Err(TaskError::NotFound(id.to_string())), record_from_row)
    }

    async fn get(&self, id: &str) -> Result<Option<TaskRecord>, TaskError> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, question, created_at, current_step, max_steps FROM tasks WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(record_from_row).transpose()
    }
}
