//! Request log collection in PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, FromRow};
use std::time::Duration;
use tracing::debug;

use fish_common::{FishError, FishResult, LogRecord, LogStatus};

use crate::store::{LogCollection, LogStore};

/// Opens one PostgreSQL connection per request.
pub struct PgLogStore {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgLogStore {
    /// Create a store from a database URL. Does not connect.
    pub fn new(database_url: &str, connect_timeout: Duration) -> FishResult<Self> {
        let options: PgConnectOptions = database_url
            .parse()
            .map_err(|e| FishError::Config(format!("Invalid database URL: {}", e)))?;

        Ok(Self {
            options,
            connect_timeout,
        })
    }

    async fn connect(&self) -> FishResult<PgConnection> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(FishError::Persistence(format!("Connection failed: {}", e))),
            Err(_) => Err(FishError::Persistence(format!(
                "Connection timed out after {:?}",
                self.connect_timeout
            ))),
        }
    }

    /// Create the log table if it does not exist.
    pub async fn migrate(&self) -> FishResult<()> {
        let mut conn = self.connect().await?;

        // Split SQL statements and execute them individually
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&mut conn)
                    .await
                    .map_err(|e| FishError::Persistence(format!("Migration failed: {}", e)))?;
            }
        }

        conn.close()
            .await
            .map_err(|e| FishError::Persistence(format!("Close failed: {}", e)))
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn open(&self) -> FishResult<Box<dyn LogCollection>> {
        let conn = self.connect().await?;
        Ok(Box::new(PgLogCollection { conn: Some(conn) }))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// A single open connection to the `request_logs` table.
pub struct PgLogCollection {
    conn: Option<PgConnection>,
}

impl PgLogCollection {
    fn conn(&mut self) -> FishResult<&mut PgConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| FishError::Persistence("Connection already closed".to_string()))
    }
}

#[async_trait]
impl LogCollection for PgLogCollection {
    async fn insert(&mut self, record: &LogRecord) -> FishResult<()> {
        let conn = self.conn()?;

        sqlx::query(
            r#"
            INSERT INTO request_logs (
                fish_name, status, message, response_code,
                logged_at, start_time, end_time
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.fish_name)
        .bind(record.status.as_str())
        .bind(&record.message)
        .bind(i32::from(record.response_code))
        .bind(record.timestamp)
        .bind(record.start_time)
        .bind(record.end_time)
        .execute(&mut *conn)
        .await
        .map_err(|e| FishError::Persistence(format!("Insert failed: {}", e)))?;

        Ok(())
    }

    async fn find_all(&mut self) -> FishResult<Vec<LogRecord>> {
        let conn = self.conn()?;

        let rows = sqlx::query_as::<_, LogRow>(
            "SELECT fish_name, status, message, response_code, \
             logged_at, start_time, end_time FROM request_logs ORDER BY id ASC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| FishError::Persistence(format!("Query failed: {}", e)))?;

        rows.into_iter().map(LogRecord::try_from).collect()
    }

    async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                debug!(error = %e, "Log store connection did not close cleanly");
            }
        }
    }
}

/// Internal row type for database queries.
#[derive(Debug, FromRow)]
struct LogRow {
    fish_name: String,
    status: String,
    message: String,
    response_code: i32,
    logged_at: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl TryFrom<LogRow> for LogRecord {
    type Error = FishError;

    fn try_from(row: LogRow) -> Result<Self, Self::Error> {
        let status: LogStatus = row.status.parse().map_err(FishError::Persistence)?;
        let response_code = u16::try_from(row.response_code).map_err(|_| {
            FishError::Persistence(format!("Invalid response code: {}", row.response_code))
        })?;

        Ok(LogRecord {
            fish_name: row.fish_name,
            status,
            message: row.message,
            response_code,
            timestamp: row.logged_at,
            start_time: row.start_time,
            end_time: row.end_time,
        })
    }
}

/// Database schema.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS request_logs (
    id BIGSERIAL PRIMARY KEY,
    fish_name TEXT NOT NULL,
    status VARCHAR(16) NOT NULL,
    message TEXT NOT NULL,
    response_code INTEGER NOT NULL,
    logged_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    start_time TIMESTAMPTZ,
    end_time TIMESTAMPTZ
);

CREATE INDEX IF NOT EXISTS idx_request_logs_fish_name ON request_logs(fish_name)
"#;
