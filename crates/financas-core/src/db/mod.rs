//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `transactions` - Expense record CRUD and per-user listings
//! - `reports` - Monthly spending aggregation

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod reports;
mod transactions;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Default database file name
pub const DEFAULT_DB_PATH: &str = "financas.db";

/// Parse a stored timestamp into a DateTime<Utc>
///
/// Accepts RFC 3339 (what we write) and SQLite's "YYYY-MM-DD HH:MM:SS".
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

/// Format a timestamp for storage; fixed width so text order is time order
pub(crate) fn format_datetime(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a database file and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        info!(path = %path, "Database ready");
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled connection
    /// sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "financas_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Analyzed expenses
            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,                       -- UUID v4
                user_id TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL DEFAULT 0,
                store TEXT NOT NULL,
                type TEXT NOT NULL,                        -- Service, Product, Subscription, Fee
                created_at TEXT NOT NULL,                  -- RFC 3339, UTC
                month TEXT NOT NULL,                       -- YYYY-MM derived from created_at
                confidence REAL,
                raw_analysis TEXT                          -- JSON of the text-analysis facets
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_created ON transactions(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_transactions_user_month ON transactions(user_id, month);
            "#,
        )?;

        Ok(())
    }
}
