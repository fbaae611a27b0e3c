//! The turn pipeline
//!
//! RECEIVED → HISTORY_LOADED → PROMPT_COMPOSED → GENERATED →
//! DIRECTIVES_RESOLVED → PERSISTED → (RETITLED) → RESPONDED.
//!
//! Generation failures do not leave this path: they arrive as answer text.

use crate::composer::{compose_system_prompt, PromptContext};
use crate::error::{Error, Result};
use colony_llm::{complete_in_band, GenerationRequest, Message};
use colony_store::{AgentDefinition, ChatMessage, ChatRole, ThreadWithMessages, User};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::engine::TurnOrchestrator;
use super::types::{TurnRequest, TurnResponse, TurnState};

fn to_llm_message(message: &ChatMessage) -> Message {
    match message.role {
        ChatRole::User => Message::user(message.content.clone()),
        ChatRole::Assistant => Message::assistant(message.content.clone()),
    }
}

impl TurnOrchestrator {
    fn advance(&self, thread_id: &str, state: TurnState) {
        debug!(thread_id = %thread_id, state = %state, "Turn state");
    }

    fn validate(request: &TurnRequest) -> Result<()> {
        if request.prompt.trim().is_empty() {
            return Err(Error::Validation("prompt is required".to_string()));
        }
        if request.thread_id.trim().is_empty() {
            return Err(Error::Validation("thread_id is required".to_string()));
        }
        if request.max_tokens == Some(0) {
            return Err(Error::Validation(
                "max_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Run one conversational turn for `user`.
    ///
    /// Turns on the same thread are serialized. Only validation and ownership
    /// failures (and storage faults) are returned as errors.
    #[instrument(skip(self, user, request), fields(user_id = %user.id, thread_id = %request.thread_id))]
    pub async fn run_turn(&self, user: &User, request: TurnRequest) -> Result<TurnResponse> {
        if let Err(e) = Self::validate(&request) {
            self.advance(&request.thread_id, TurnState::ValidationFailed);
            return Err(e);
        }

        let thread_id = request.thread_id.clone();
        let lock = self
            .thread_locks
            .entry(thread_id.clone())
            .or_default()
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.process(user, request).await
        };

        drop(lock);
        self.thread_locks
            .remove_if(&thread_id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn process(&self, user: &User, request: TurnRequest) -> Result<TurnResponse> {
        let thread_id = request.thread_id.as_str();
        self.advance(thread_id, TurnState::Received);

        let requested_agent = request.agent_id.as_deref().and_then(|raw| {
            Uuid::parse_str(raw.trim())
                .map_err(|_| warn!("Ignoring malformed agent id {:?}", raw))
                .ok()
        });

        let turn = match self
            .conversations
            .append_turn(thread_id, &user.id, requested_agent, &request.prompt)
            .await
        {
            Ok(turn) => turn,
            Err(colony_store::Error::Unauthorized(msg)) => {
                self.advance(thread_id, TurnState::Unauthorized);
                return Err(Error::Unauthorized(msg));
            }
            Err(e) => return Err(e.into()),
        };
        let mut thread = turn.thread;
        self.advance(thread_id, TurnState::HistoryLoaded);

        let visible = self.catalog.list_visible(user).await?;
        let active_agent = self.active_agent(
            requested_agent.or(thread.agent_id),
            &visible,
        );

        let system = compose_system_prompt(PromptContext {
            instruction_override: request.system_instruction.as_deref(),
            active_agent,
            role: &user.role,
            catalog: &visible,
        });
        self.advance(thread_id, TurnState::PromptComposed);

        let profile = self
            .personas
            .resolve(request.industry.as_deref(), request.persona.as_deref());
        let history: Vec<Message> = turn.history.iter().map(to_llm_message).collect();
        let generation = GenerationRequest::new(
            profile.clone(),
            system,
            history,
            request.prompt.clone(),
            request.max_tokens.unwrap_or(self.config.default_max_tokens),
        );
        let raw_answer = complete_in_band(self.generator.as_ref(), generation).await;
        self.advance(thread_id, TurnState::Generated);

        let extraction = self.parser.extract(&raw_answer);
        let provisioned_agents = self
            .provisioner
            .provision(extraction.directives, user)
            .await;
        self.advance(thread_id, TurnState::DirectivesResolved);

        let answer = extraction.cleaned;
        self.conversations.append_assistant(&thread, &answer).await?;
        self.advance(thread_id, TurnState::Persisted);

        let titles = &self.titles;
        let title_profile = &profile;
        let retitled = self
            .conversations
            .maybe_retitle(
                &mut thread,
                turn.is_new_thread,
                &request.prompt,
                |prompt| async move { titles.synthesize(&prompt, title_profile).await },
            )
            .await?;
        if retitled {
            self.advance(thread_id, TurnState::Retitled);
        }

        self.conversations.touch(&mut thread).await?;
        let messages = self.conversations.messages(thread_id).await?;

        info!(
            provisioned = provisioned_agents.len(),
            messages = messages.len(),
            "Turn completed"
        );
        self.advance(thread_id, TurnState::Responded);

        Ok(TurnResponse {
            answer,
            thread: ThreadWithMessages { thread, messages },
            provisioned: !provisioned_agents.is_empty(),
            provisioned_agents,
        })
    }

    /// The agent to speak as, if it exists and the user may see it
    fn active_agent<'a>(
        &self,
        agent_id: Option<Uuid>,
        visible: &'a [AgentDefinition],
    ) -> Option<&'a AgentDefinition> {
        let id = agent_id?;
        let agent = visible.iter().find(|a| a.id == id);
        if agent.is_none() {
            warn!(agent_id = %id, "Agent missing or not visible, continuing without it");
        }
        agent
    }
}
