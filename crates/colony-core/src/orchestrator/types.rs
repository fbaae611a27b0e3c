//! Turn request/response types and the turn state machine

use colony_store::{AgentDefinition, ThreadWithMessages};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input for one conversational turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    /// The user's message
    #[serde(default)]
    pub prompt: String,
    /// Caller-chosen thread id; unseen ids create a thread
    #[serde(default)]
    pub thread_id: String,
    /// Agent to talk to
    #[serde(default, alias = "ant_id")]
    pub agent_id: Option<String>,
    /// Per-call instruction override
    #[serde(default)]
    pub system_instruction: Option<String>,
    /// Token budget for the answer
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Industry profile key
    #[serde(default)]
    pub industry: Option<String>,
    /// Persona profile key
    #[serde(default)]
    pub persona: Option<String>,
}

impl TurnRequest {
    /// Create a request for a thread
    #[must_use]
    pub fn new(thread_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            thread_id: thread_id.into(),
            ..Default::default()
        }
    }

    /// Set the agent
    #[must_use]
    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Override the base instruction
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set the token budget
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Select an industry/persona profile
    #[must_use]
    pub fn with_persona(mut self, industry: impl Into<String>, persona: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self.persona = Some(persona.into());
        self
    }
}

/// Outcome of one conversational turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    /// Displayed answer (directive span replaced, or an in-band error text)
    pub answer: String,
    /// The thread after the turn, with all messages
    pub thread: ThreadWithMessages,
    /// Whether at least one agent was created
    pub provisioned: bool,
    /// Agents created during the turn
    #[serde(skip)]
    pub provisioned_agents: Vec<AgentDefinition>,
}

/// Stages of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Request accepted
    Received,
    /// Prompt stored, prior history read
    HistoryLoaded,
    /// System instruction built
    PromptComposed,
    /// Answer text available (possibly an in-band error)
    Generated,
    /// Directives parsed and agents created
    DirectivesResolved,
    /// Answer stored
    Persisted,
    /// Thread title changed
    Retitled,
    /// Response returned
    Responded,
    /// Thread owned by someone else
    Unauthorized,
    /// Missing prompt or thread id
    ValidationFailed,
}

impl TurnState {
    /// Whether no further transition follows
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Responded | Self::Unauthorized | Self::ValidationFailed
        )
    }

    /// Get the state as a string
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::HistoryLoaded => "history_loaded",
            Self::PromptComposed => "prompt_composed",
            Self::Generated => "generated",
            Self::DirectivesResolved => "directives_resolved",
            Self::Persisted => "persisted",
            Self::Retitled => "retitled",
            Self::Responded => "responded",
            Self::Unauthorized => "unauthorized",
            Self::ValidationFailed => "validation_failed",
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
