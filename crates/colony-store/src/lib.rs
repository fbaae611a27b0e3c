//! Colony Store - Persistence for the agent hub
//!
//! This crate provides the durable state of Colony, backed by SQLite:
//! - Model: agents, role bindings, threads and messages
//! - Catalog: agent definitions and the visibility rule
//! - Conversation: thread/message persistence with ownership checks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod conversation;
pub mod database;
pub mod error;
mod helpers;
pub mod model;

pub use catalog::{AgentCatalog, DEFAULT_AGENTS};
pub use conversation::{ConversationStore, TurnContext};
pub use database::Database;
pub use error::{Error, Result};
pub use helpers::{default_data_dir, default_db_path};
pub use model::{
    is_visible_to, normalize_title, AgentDefinition, AgentPatch, AgentWithRoles, ChatMessage,
    ChatRole, NewAgent, RoleBinding, Thread, ThreadWithMessages, User, NEW_CHAT_TITLE,
};
