// src/store/sql.rs

use async_trait::async_trait;
use sqlx::{AnyPool, any::AnyPoolOptions};
use std::time::Duration;

use super::{ResultStore, now_timestamp, statements::Statements};
use crate::{
    config::Backend,
    error::AppResult,
    models::quiz_result::{NewQuizResult, Pagination, QuizResult, QuizResultRow, StudentPage},
};

/// Result store over either Postgres or a SQLite file.
///
/// The pool is driver-agnostic; only the placeholder syntax and DDL in
/// `Statements` depend on the backend.
pub struct SqlResultStore {
    pool: AnyPool,
    sql: Statements,
}

impl SqlResultStore {
    pub fn new(pool: AnyPool, backend: Backend) -> Self {
        Self {
            pool,
            sql: Statements::new(backend),
        }
    }

    /// Opens a pool for `url`. SQLite files are created if missing.
    pub async fn connect(
        url: &str,
        backend: Backend,
        max_connections: u32,
    ) -> Result<AnyPool, sqlx::Error> {
        sqlx::any::install_default_drivers();

        let url = match backend {
            Backend::Sqlite => sqlite_create_if_missing(url),
            Backend::Postgres => url.to_string(),
        };

        AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&url)
            .await
    }
}

/// Adds `mode=rwc` to a file-backed SQLite URL that does not pick a mode.
fn sqlite_create_if_missing(url: &str) -> String {
    if url.contains(":memory:") || url.contains("mode=") {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&mode=rwc", url)
    } else {
        format!("{}?mode=rwc", url)
    }
}

#[async_trait]
impl ResultStore for SqlResultStore {
    async fn init(&self) -> AppResult<()> {
        sqlx::query(&self.sql.create_table)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert(&self, result: NewQuizResult) -> AppResult<i64> {
        let answers = result.answers.encode()?;
        let submit_time = result.submit_time.unwrap_or_else(now_timestamp);

        let id: i64 = sqlx::query_scalar(&self.sql.insert)
            .bind(&result.class_name)
            .bind(&result.student_name)
            .bind(&result.seat_number)
            .bind(result.score)
            .bind(answers)
            .bind(&submit_time)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert quiz result: {:?}", e);
                e
            })?;

        Ok(id)
    }

    async fn list(
        &self,
        class: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> AppResult<StudentPage> {
        let offset = Pagination::offset(page, per_page)?;

        let (total, rows) = match class {
            Some(class) => {
                let total: i64 = sqlx::query_scalar(&self.sql.count_by_class)
                    .bind(class)
                    .fetch_one(&self.pool)
                    .await?;
                let rows: Vec<QuizResultRow> = sqlx::query_as(&self.sql.page_by_class)
                    .bind(class)
                    .bind(per_page)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?;
                (total, rows)
            }
            None => {
                let total: i64 = sqlx::query_scalar(&self.sql.count_all)
                    .fetch_one(&self.pool)
                    .await?;
                let rows: Vec<QuizResultRow> = sqlx::query_as(&self.sql.page_all)
                    .bind(per_page)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?;
                (total, rows)
            }
        };

        let students = rows
            .into_iter()
            .map(QuizResult::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(StudentPage {
            students,
            pagination: Pagination::new(total, page, per_page),
        })
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let deleted = sqlx::query(&self.sql.delete)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        tracing::debug!("Deleted {} quiz result(s) with id {}", deleted, id);
        Ok(())
    }

    async fn all(&self) -> AppResult<Vec<QuizResult>> {
        let rows: Vec<QuizResultRow> = sqlx::query_as(&self.sql.select_all)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(QuizResult::try_from).collect()
    }
}
