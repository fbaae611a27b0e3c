//! Database - SQLite connection pool and schema

use crate::error::{Error, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS agents (
        id TEXT PRIMARY KEY,
        owner_id TEXT,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        icon TEXT NOT NULL DEFAULT 'Sparkles',
        instruction TEXT NOT NULL,
        category TEXT NOT NULL,
        is_system INTEGER NOT NULL DEFAULT 0,
        is_public INTEGER NOT NULL DEFAULT 0,
        is_global INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS agent_role_bindings (
        agent_id TEXT NOT NULL,
        role_name TEXT NOT NULL,
        PRIMARY KEY (agent_id, role_name),
        FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS threads (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        agent_id TEXT,
        title TEXT NOT NULL DEFAULT 'New Chat',
        folder_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        thread_id TEXT NOT NULL,
        role TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY (thread_id) REFERENCES threads(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_agents_owner ON agents(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_bindings_role ON agent_role_bindings(role_name)",
    "CREATE INDEX IF NOT EXISTS idx_threads_owner ON threads(owner_id, updated_at)",
    "CREATE INDEX IF NOT EXISTS idx_messages_thread ON messages(thread_id, created_at)",
];

/// Shared SQLite handle for the catalog and the conversation store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and run migrations
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Database(format!("failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let db = Self { pool };
        db.run_migrations().await?;

        info!("SQLite database initialized at {}", db_path.display());
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub async fn in_memory() -> Result<Self> {
        // A recycled connection would drop the whole database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let db = Self { pool };
        db.run_migrations().await?;

        debug!("In-memory SQLite database initialized");
        Ok(db)
    }

    /// Get a reference to the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    async fn run_migrations(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Database(e.to_string()))?;
        }
        Ok(())
    }
}
