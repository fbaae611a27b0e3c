//! Row conversion helpers

use crate::error::Error;
use crate::model::{AgentDefinition, ChatMessage, ChatRole, Thread};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Timestamps are stored as RFC3339 text with microsecond precision
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("invalid timestamp: {e}")))
}

fn parse_uuid(value: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|e| Error::Serialization(format!("invalid uuid: {e}")))
}

/// Convert a SQLite row to an AgentDefinition
pub(crate) fn row_to_agent(row: SqliteRow) -> Result<AgentDefinition, Error> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(AgentDefinition {
        id: parse_uuid(&id_str)?,
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        icon: row.get("icon"),
        instruction: row.get("instruction"),
        category: row.get("category"),
        is_system: row.get("is_system"),
        is_public: row.get("is_public"),
        is_global: row.get("is_global"),
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

/// Convert a SQLite row to a Thread
pub(crate) fn row_to_thread(row: SqliteRow) -> Result<Thread, Error> {
    let agent_id_str: Option<String> = row.get("agent_id");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(Thread {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        agent_id: agent_id_str.as_deref().map(parse_uuid).transpose()?,
        title: row.get("title"),
        folder_id: row.get("folder_id"),
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

/// Convert a SQLite row to a ChatMessage
pub(crate) fn row_to_message(row: SqliteRow) -> Result<ChatMessage, Error> {
    let id_str: String = row.get("id");
    let role_str: String = row.get("role");
    let created_at_str: String = row.get("created_at");

    let role: ChatRole = role_str
        .parse()
        .map_err(|e: String| Error::Serialization(e))?;

    Ok(ChatMessage {
        id: parse_uuid(&id_str)?,
        thread_id: row.get("thread_id"),
        role,
        content: row.get("content"),
        created_at: parse_timestamp(&created_at_str)?,
    })
}

/// Get the default data directory for Colony
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".colony"))
        .unwrap_or_else(|| std::path::PathBuf::from(".colony"))
}

/// Get the default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join("colony.db")
}
