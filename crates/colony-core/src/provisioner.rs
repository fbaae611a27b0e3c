//! Agent provisioning from parsed directives

use crate::directive::RawDirective;
use colony_store::{AgentCatalog, AgentDefinition, NewAgent, User};
use tracing::{info, warn};

/// Creates catalog entries requested by the model
#[derive(Clone)]
pub struct AgentProvisioner {
    catalog: AgentCatalog,
}

impl AgentProvisioner {
    /// Create a provisioner over a catalog
    #[must_use]
    pub fn new(catalog: AgentCatalog) -> Self {
        Self { catalog }
    }

    /// Create one private agent per directive, owned by `user`.
    ///
    /// Each directive stands alone: one the store fails to write is logged
    /// and skipped.
    pub async fn provision(
        &self,
        directives: Vec<RawDirective>,
        user: &User,
    ) -> Vec<AgentDefinition> {
        let mut created = Vec::with_capacity(directives.len());

        for directive in directives {
            let name = directive.name.clone();
            let input = NewAgent::new(directive.name, directive.instruction, directive.category)
                .with_description(directive.description)
                .with_icon(directive.icon);

            match self.catalog.create_private(input, user).await {
                Ok(agent) => {
                    info!(agent_id = %agent.id, owner = %user.id, "Provisioned agent {}", name);
                    created.push(agent);
                }
                Err(e) => {
                    warn!(error = %e, "Skipping directive for {}", name);
                }
            }
        }

        created
    }
}
