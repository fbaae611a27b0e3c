//! Conversation - Thread and message persistence
//!
//! Threads are created lazily on first reference, keyed by a caller-supplied
//! id; the first writer becomes the owner. Messages are append-only and are
//! always read oldest first, ties broken by insertion order.


use crate::database::Database;
use crate::error::{Error, Result};
use crate::helpers::{format_timestamp, row_to_message, row_to_thread};
use crate::model::{
    normalize_title, ChatMessage, ChatRole, Thread, ThreadWithMessages, NEW_CHAT_TITLE,
};
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use std::future::Future;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const MAX_TITLE_CHARS: usize = 100;

const THREAD_COLUMNS: &str =
    "id, owner_id, agent_id, title, folder_id, created_at, updated_at";

/// Result of recording the user half of a turn
#[derive(Debug, Clone)]
pub struct TurnContext {
    /// The (possibly just created) thread
    pub thread: Thread,
    /// Messages before the prompt that was just appended, oldest first
    pub history: Vec<ChatMessage>,
    /// Whether this call created the thread
    pub is_new_thread: bool,
}

/// Thread/message store backed by SQLite
#[derive(Clone)]
pub struct ConversationStore {
    db: Database,
}

impl ConversationStore {
    /// Create a store over an open database
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a user prompt.
    ///
    /// Finds or creates `thread_id` (owned by `owner_id` when created),
    /// rejects foreign owners without writing anything, appends the prompt and
    /// returns the history that preceded it. The prompt itself is never part of
    /// the returned history.
    #[instrument(skip(self, user_text), fields(thread_id = %thread_id, owner_id = %owner_id))]
    pub async fn append_turn(
        &self,
        thread_id: &str,
        owner_id: &str,
        agent_id: Option<Uuid>,
        user_text: &str,
    ) -> Result<TurnContext> {
        let now = format_timestamp(Utc::now());
        let mut tx = self.begin().await?;

        let created = sqlx::query(
            r#"
            INSERT INTO threads (id, owner_id, agent_id, title, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(thread_id)
        .bind(owner_id)
        .bind(agent_id.map(|id| id.to_string()))
        .bind(NEW_CHAT_TITLE)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Database(e.to_string()))?
        .rows_affected()
            == 1;

        let sql = format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(thread_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        let thread = row_to_thread(row)?;

        if thread.owner_id != owner_id {
            // Dropping the transaction rolls it back
            return Err(Error::Unauthorized(format!(
                "thread {thread_id} belongs to another user"
            )));
        }

        insert_message(&mut tx, thread_id, ChatRole::User, user_text).await?;
        tx.commit()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut history = self.messages(thread_id).await?;
        history.pop();

        if created {
            info!("Created thread {}", thread_id);
        }
        debug!("Loaded {} prior messages", history.len());

        Ok(TurnContext {
            thread,
            history,
            is_new_thread: created,
        })
    }

    /// Append the assistant's reply, whatever its content
    #[instrument(skip(self, thread, text), fields(thread_id = %thread.id))]
    pub async fn append_assistant(&self, thread: &Thread, text: &str) -> Result<ChatMessage> {
        let mut tx = self.begin().await?;
        let message = insert_message(&mut tx, &thread.id, ChatRole::Assistant, text).await?;
        tx.commit()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(message)
    }

    /// Retitle the thread if it is new or still carries the default title.
    ///
    /// `title_fn` receives `first_user_text`; its output is trimmed and
    /// unquoted, falling back to the default title. Returns whether the
    /// stored title changed.
    #[instrument(skip(self, thread, first_user_text, title_fn), fields(thread_id = %thread.id))]
    pub async fn maybe_retitle<F, Fut>(
        &self,
        thread: &mut Thread,
        is_new_thread: bool,
        first_user_text: &str,
        title_fn: F,
    ) -> Result<bool>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = String>,
    {
        if !is_new_thread && !thread.has_default_title() {
            return Ok(false);
        }

        let title = normalize_title(&title_fn(first_user_text.to_string()).await);
        if title == thread.title {
            debug!("Thread {} keeps title {:?}", thread.id, title);
            return Ok(false);
        }

        sqlx::query("UPDATE threads SET title = ? WHERE id = ?")
            .bind(&title)
            .bind(&thread.id)
            .execute(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        debug!("Thread {} titled {:?}", thread.id, title);
        thread.title = title;
        Ok(true)
    }

    /// Bump the thread's activity time
    pub async fn touch(&self, thread: &mut Thread) -> Result<()> {
        let now = Utc::now();
        sqlx::query("UPDATE threads SET updated_at = ? WHERE id = ?")
            .bind(format_timestamp(now))
            .bind(&thread.id)
            .execute(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        thread.updated_at = now;
        Ok(())
    }

    /// All messages of a thread, oldest first
    pub async fn messages(&self, thread_id: &str) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, thread_id, role, content, created_at
            FROM messages
            WHERE thread_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(thread_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(row_to_message).collect()
    }

    /// Threads owned by `owner_id`, most recently active first
    #[instrument(skip(self))]
    pub async fn list_threads(&self, owner_id: &str) -> Result<Vec<Thread>> {
        let sql = format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE owner_id = ? \
             ORDER BY updated_at DESC, rowid DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(row_to_thread).collect()
    }

    /// A thread with its messages; threads of other owners are reported as missing
    #[instrument(skip(self))]
    pub async fn get_thread(&self, thread_id: &str, owner_id: &str) -> Result<ThreadWithMessages> {
        let thread = self.owned_thread(thread_id, owner_id).await?;
        let messages = self.messages(thread_id).await?;
        Ok(ThreadWithMessages { thread, messages })
    }

    /// Rename a thread (1 to 100 characters after trimming)
    #[instrument(skip(self))]
    pub async fn rename_thread(&self, thread_id: &str, owner_id: &str, title: &str) -> Result<Thread> {
        let title = title.trim();
        let len = title.chars().count();
        if len == 0 || len > MAX_TITLE_CHARS {
            return Err(Error::Validation(format!(
                "title must be between 1 and {MAX_TITLE_CHARS} characters"
            )));
        }

        let mut thread = self.owned_thread(thread_id, owner_id).await?;
        sqlx::query("UPDATE threads SET title = ? WHERE id = ?")
            .bind(title)
            .bind(thread_id)
            .execute(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        thread.title = title.to_string();
        Ok(thread)
    }

    /// Delete a thread and its messages
    #[instrument(skip(self))]
    pub async fn delete_thread(&self, thread_id: &str, owner_id: &str) -> Result<()> {
        self.owned_thread(thread_id, owner_id).await?;

        let mut tx = self.begin().await?;
        sqlx::query("DELETE FROM messages WHERE thread_id = ?")
            .bind(thread_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(thread_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        tx.commit()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        info!("Deleted thread {}", thread_id);
        Ok(())
    }

    async fn owned_thread(&self, thread_id: &str, owner_id: &str) -> Result<Thread> {
        let sql = format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = ? AND owner_id = ?");
        sqlx::query(&sql)
            .bind(thread_id)
            .bind(owner_id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?
            .map(row_to_thread)
            .transpose()?
            .ok_or_else(|| Error::NotFound(format!("thread {thread_id}")))
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.db
            .pool()
            .begin()
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }
}

async fn insert_message(
    tx: &mut Transaction<'static, Sqlite>,
    thread_id: &str,
    role: ChatRole,
    content: &str,
) -> Result<ChatMessage> {
    let message = ChatMessage {
        id: Uuid::new_v4(),
        thread_id: thread_id.to_string(),
        role,
        content: content.to_string(),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO messages (id, thread_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(message.id.to_string())
    .bind(&message.thread_id)
    .bind(message.role.as_str())
    .bind(&message.content)
    .bind(format_timestamp(message.created_at))
    .execute(&mut **tx)
    .await
    .map_err(|e| Error::Database(e.to_string()))?;

    Ok(message)
}
