//! Data model for the hub
//!
//! Agents are persona configurations owned by a user (or by nobody, for the
//! platform defaults). Threads own an ordered, append-only list of messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Title every thread carries until one is synthesized
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Characters stripped from both ends of a synthesized title
const TITLE_TRIM_CHARS: &[char] = &['"', '\'', '`', '“', '”', '‘', '’'];

/// The acting user, as supplied by the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// External user identifier
    pub id: String,
    /// Free-text role label
    pub role: String,
    /// Whether the user is an administrator
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Create a non-admin user
    #[must_use]
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            is_admin: false,
        }
    }

    /// Create an administrator
    #[must_use]
    pub fn admin(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(id, role)
        }
    }

    /// Whether this user may modify a record owned by `owner_id`
    #[must_use]
    pub fn can_manage(&self, owner_id: Option<&str>) -> bool {
        self.is_admin || owner_id == Some(self.id.as_str())
    }
}

/// A persona configuration in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user; `None` for platform defaults
    pub owner_id: Option<String>,
    /// Display name
    pub name: String,
    /// Declared purpose
    pub description: String,
    /// Icon name
    pub icon: String,
    /// Base system instruction
    pub instruction: String,
    /// Catalog category
    pub category: String,
    /// Platform-provided agent
    pub is_system: bool,
    /// Visible to every user
    pub is_public: bool,
    /// Visible to every user, set by admins only
    pub is_global: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Grant of visibility to every user with a given role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    /// Bound agent
    pub agent_id: Uuid,
    /// Role label
    pub role_name: String,
}

/// Agent together with its role bindings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentWithRoles {
    /// The agent
    #[serde(flatten)]
    pub agent: AgentDefinition,
    /// Role labels bound to the agent
    pub roles: Vec<String>,
}

/// The visibility rule.
///
/// An agent is visible iff it is global, owned by the user, public, or bound
/// to the user's role. `bound_roles` are the role labels bound to `agent`.
#[must_use]
pub fn is_visible_to(agent: &AgentDefinition, user: &User, bound_roles: &[String]) -> bool {
    agent.is_global
        || agent.owner_id.as_deref() == Some(user.id.as_str())
        || agent.is_public
        || bound_roles.iter().any(|r| r == &user.role)
}

fn default_icon() -> String {
    "Sparkles".to_string()
}

/// Input for creating an agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAgent {
    /// Display name
    pub name: String,
    /// Declared purpose
    #[serde(default)]
    pub description: String,
    /// Icon name
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Base system instruction
    #[serde(alias = "system_instruction")]
    pub instruction: String,
    /// Catalog category
    pub category: String,
    /// Visible to every user
    #[serde(default)]
    pub is_public: bool,
    /// Requested system flag (admins only)
    #[serde(default)]
    pub is_system: bool,
    /// Requested global flag (admins only)
    #[serde(default)]
    pub is_global: bool,
    /// Role labels to bind (admins only)
    #[serde(default)]
    pub assigned_roles: Vec<String>,
}

impl NewAgent {
    /// Create input with the required fields
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            category: category.into(),
            icon: default_icon(),
            ..Default::default()
        }
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set icon
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Mark as public
    #[must_use]
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Request the global flag
    #[must_use]
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    /// Request the system flag
    #[must_use]
    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    /// Set role bindings
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.assigned_roles = roles;
        self
    }
}

/// Partial update of an agent; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPatch {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New icon
    pub icon: Option<String>,
    /// New instruction
    #[serde(alias = "system_instruction")]
    pub instruction: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New public flag
    pub is_public: Option<bool>,
    /// New system flag (admins only)
    pub is_system: Option<bool>,
    /// New global flag (admins only)
    pub is_global: Option<bool>,
    /// Replacement role bindings (admins only, full replace)
    pub assigned_roles: Option<Vec<String>>,
}

impl AgentPatch {
    /// Whether the patch carries fields only an admin may change
    #[must_use]
    pub fn has_admin_fields(&self) -> bool {
        self.is_system.is_some() || self.is_global.is_some() || self.assigned_roles.is_some()
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The human participant
    User,
    /// The model
    Assistant,
}

impl ChatRole {
    /// Get the role as a string
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("unknown message role: {other}")),
        }
    }
}

/// A conversation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    /// Caller-supplied identifier
    pub id: String,
    /// Owning user, immutable after creation
    pub owner_id: String,
    /// Agent the thread was started with; may dangle after agent deletion
    pub agent_id: Option<Uuid>,
    /// Display title
    pub title: String,
    /// Folder reference (folders are managed elsewhere)
    pub folder_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last activity time
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// Whether the title is still the placeholder
    #[must_use]
    pub fn has_default_title(&self) -> bool {
        self.title == NEW_CHAT_TITLE
    }
}

/// A single message in a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier
    pub id: Uuid,
    /// Owning thread
    pub thread_id: String,
    /// Author
    pub role: ChatRole,
    /// Text
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Thread with its ordered messages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadWithMessages {
    /// The thread
    #[serde(flatten)]
    pub thread: Thread,
    /// Messages, oldest first
    pub messages: Vec<ChatMessage>,
}

/// Clean a synthesized title: trim whitespace and surrounding quotes,
/// falling back to [`NEW_CHAT_TITLE`] when nothing is left.
#[must_use]
pub fn normalize_title(raw: &str) -> String {
    let cleaned = raw
        .trim()
        .trim_matches(|c: char| c.is_whitespace() || TITLE_TRIM_CHARS.contains(&c));
    if cleaned.is_empty() {
        NEW_CHAT_TITLE.to_string()
    } else {
        cleaned.to_string()
    }
}
