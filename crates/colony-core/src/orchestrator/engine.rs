//! Orchestrator struct and builder methods

use crate::directive::{DirectiveParser, MarkerDirectiveParser};
use crate::persona::PersonaRegistry;
use crate::provisioner::AgentProvisioner;
use crate::title::TitleSynthesizer;
use colony_llm::Generator;
use colony_store::{AgentCatalog, ConversationStore, Database};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::config::OrchestratorConfig;

/// Sequences catalog, composer, generator, parser, provisioner and titles per turn
pub struct TurnOrchestrator {
    pub(crate) catalog: AgentCatalog,
    pub(crate) conversations: ConversationStore,
    pub(crate) generator: Arc<dyn Generator>,
    pub(crate) parser: Arc<dyn DirectiveParser>,
    pub(crate) provisioner: AgentProvisioner,
    pub(crate) titles: TitleSynthesizer,
    pub(crate) personas: PersonaRegistry,
    pub(crate) config: OrchestratorConfig,
    /// One lock per thread id with a turn in flight
    pub(crate) thread_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl TurnOrchestrator {
    /// Create a new orchestrator over a database and a generator
    #[must_use]
    pub fn new(db: Database, generator: Arc<dyn Generator>, config: OrchestratorConfig) -> Self {
        let catalog = AgentCatalog::new(db.clone());
        info!(generator = generator.name(), "Turn orchestrator ready");

        Self {
            provisioner: AgentProvisioner::new(catalog.clone()),
            conversations: ConversationStore::new(db),
            catalog,
            titles: TitleSynthesizer::new(generator.clone())
                .with_max_tokens(config.title_max_tokens),
            generator,
            parser: Arc::new(MarkerDirectiveParser::new()),
            personas: PersonaRegistry::default(),
            config,
            thread_locks: Arc::new(DashMap::new()),
        }
    }

    /// Replace the directive parser
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn DirectiveParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Set the industry/persona profiles
    #[must_use]
    pub fn with_personas(mut self, personas: PersonaRegistry) -> Self {
        self.personas = personas;
        self
    }

    /// The agent catalog
    #[must_use]
    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    /// The conversation store
    #[must_use]
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// The persona profiles
    #[must_use]
    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }
}
