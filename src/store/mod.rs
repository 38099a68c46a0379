// src/store/mod.rs

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use crate::{
    config::Config,
    error::AppResult,
    models::quiz_result::{NewQuizResult, QuizResult, StudentPage},
};

pub mod sql;
pub mod statements;

pub use sql::SqlResultStore;
pub use statements::Statements;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Durable storage of quiz submissions.
///
/// Handlers and the aggregator only see this trait, never a concrete
/// backend.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Creates the `quiz_results` table if it does not exist.
    async fn init(&self) -> AppResult<()>;

    /// Writes one submission and returns its newly assigned id.
    async fn insert(&self, result: NewQuizResult) -> AppResult<i64>;

    /// Newest-first page of submissions, optionally for a single class.
    ///
    /// The count and the page are two separate reads, so a concurrent
    /// insert may make `total` and the returned rows disagree slightly.
    async fn list(
        &self,
        class: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> AppResult<StudentPage>;

    /// Removes the submission with this id. Missing ids are not an error.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    /// Every stored submission, in id order.
    async fn all(&self) -> AppResult<Vec<QuizResult>>;
}

pub type SharedStore = Arc<dyn ResultStore>;

/// Current time in the format used for defaulted `submit_time` values.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Retries `connect` a bounded number of times while the database comes up.
async fn connect_with_retry<P, F, Fut>(mut connect: F) -> Result<P, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<P, sqlx::Error>>,
{
    let mut attempt = 1;
    loop {
        match connect().await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt >= CONNECT_ATTEMPTS => return Err(e),
            Err(e) => {
                tracing::warn!(
                    "Database not ready ({}), retrying in {:?}... (Attempt {})",
                    e,
                    CONNECT_BACKOFF,
                    attempt
                );
                attempt += 1;
                tokio::time::sleep(CONNECT_BACKOFF).await;
            }
        }
    }
}

/// Opens the configured backend and makes sure the table exists.
pub async fn connect(config: &Config) -> AppResult<SharedStore> {
    let pool = connect_with_retry(|| {
        SqlResultStore::connect(&config.database_url, config.backend, config.max_connections)
    })
    .await?;
    let store: SharedStore = Arc::new(SqlResultStore::new(pool, config.backend));

    tracing::info!("Database connected ({:?})", config.backend);
    store.init().await?;
    tracing::info!("quiz_results table ready");

    Ok(store)
}
