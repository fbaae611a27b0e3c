//! System prompt composition
//!
//! The instruction sent with every turn is four blocks joined by a blank
//! line, always in this order:
//!
//! 1. base instruction (explicit override, else the agent's, else generic)
//! 2. platform self-knowledge, plus the active agent's identity
//! 3. deterministic context: user role, visible catalog, provisioning protocol
//! 4. domain enforcement
//!
//! Composition is pure; the same inputs always yield the same string.

use crate::directive::DIRECTIVE_MARKER;
use colony_llm::GENERIC_INSTRUCTION;
use colony_store::AgentDefinition;
use serde::Serialize;

const PLATFORM_LINES: &[&str] = &[
    "Platform: Colony Core (Proprietary Agentic Ecosystem).",
    "Architecture: Specialized Multi-Agent Network.",
];

const SYSTEM_AWARENESS: &str = "System Awareness: You are contextually aware of being part of \
     a larger platform. You understand that you collaborate with other specialized agents. If you \
     observe any technical inconsistencies (like a session title mismatch), you are authorized to \
     acknowledge it and state your commitment to maintaining the integrity of the user's workflow.";

const DOMAIN_ENFORCEMENT: &str = "CRITICAL DOMAIN ENFORCEMENT:\n\
     You are a specialized intelligence agent. You MUST stay strictly within your designated \
     expertise. Do NOT be multi-purpose.\n\
     - If asked for something outside your domain (e.g., Marketing agent asked for Code, or Coder \
     asked for Marketing), you MUST decline. Say: 'I am specialized strictly in [Domain]. For \
     [Task], please use one of our [Relevant Category] agents.'\n\
     - NEVER provide even 'basic' help for out-of-domain tasks. Partial help is a violation of \
     protocol.";

/// One catalog entry as shown to the model
#[derive(Serialize)]
struct CatalogEntry<'a> {
    name: &'a str,
    description: &'a str,
    category: &'a str,
}

/// Inputs to [`compose_system_prompt`]
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Per-call instruction override
    pub instruction_override: Option<&'a str>,
    /// The agent the user is talking to, if any
    pub active_agent: Option<&'a AgentDefinition>,
    /// The acting user's role label
    pub role: &'a str,
    /// Agents visible to the acting user
    pub catalog: &'a [AgentDefinition],
}

/// Build the system instruction for a turn
#[must_use]
pub fn compose_system_prompt(ctx: PromptContext<'_>) -> String {
    [
        base_instruction(&ctx).to_string(),
        self_knowledge_block(ctx.active_agent),
        deterministic_context_block(ctx.role, ctx.catalog),
        DOMAIN_ENFORCEMENT.to_string(),
    ]
    .join("\n\n")
}

fn non_blank(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

fn base_instruction<'a>(ctx: &PromptContext<'a>) -> &'a str {
    ctx.instruction_override
        .and_then(non_blank)
        .or_else(|| ctx.active_agent.and_then(|a| non_blank(&a.instruction)))
        .unwrap_or(GENERIC_INSTRUCTION)
}

fn self_knowledge_block(agent: Option<&AgentDefinition>) -> String {
    let mut lines = vec!["[SYSTEM_SELF_KNOWLEDGE]".to_string()];
    lines.extend(PLATFORM_LINES.iter().map(|l| (*l).to_string()));
    if let Some(agent) = agent {
        lines.push(format!(
            "Your Identity: You are '{}', a specialized agent within Colony.",
            agent.name
        ));
        lines.push(format!("Your Designated Purpose: {}", agent.description));
    }
    lines.push(SYSTEM_AWARENESS.to_string());
    lines.join("\n")
}

/// Compact JSON listing of the catalog: `[{"name":..,"description":..,"category":..}]`
#[must_use]
pub fn catalog_listing(catalog: &[AgentDefinition]) -> String {
    let entries: Vec<CatalogEntry<'_>> = catalog
        .iter()
        .map(|a| CatalogEntry {
            name: &a.name,
            description: &a.description,
            category: &a.category,
        })
        .collect();
    serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
}

fn deterministic_context_block(role: &str, catalog: &[AgentDefinition]) -> String {
    format!(
        "[DETERMINISTIC CONTEXT]\n\
         The user's role is: {role}. Available agents: {listing}.\n\
         If the user asks for recommendations, suggest both existing and NEW specialized agents.\n\
         CRITICAL: If the user says 'okay create them' or similar, respond with exactly \
         {DIRECTIVE_MARKER} followed by a JSON object for each agent: \
         {{\"name\": \"...\", \"description\": \"...\", \"icon\": \"...\", \
         \"system_instruction\": \"...\", \"category\": \"...\"}}.",
        listing = catalog_listing(catalog),
    )
}
