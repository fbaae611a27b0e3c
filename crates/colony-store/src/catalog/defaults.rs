//! Platform default agents

/// A system-owned agent inserted by `seed_defaults`
#[derive(Debug, Clone, Copy)]
pub struct DefaultAgent {
    /// Display name
    pub name: &'static str,
    /// Declared purpose
    pub description: &'static str,
    /// Icon name
    pub icon: &'static str,
    /// Base system instruction
    pub instruction: &'static str,
    /// Catalog category
    pub category: &'static str,
}

/// Agents every installation starts with
pub const DEFAULT_AGENTS: &[DefaultAgent] = &[
    DefaultAgent {
        name: "General Assistant",
        description: "A helpful, harmless, and honest AI assistant for everyday tasks.",
        icon: "Sparkles",
        instruction: "You are a helpful, harmless, and honest AI assistant. \
                      Answer questions clearly and concisely.",
        category: "general",
    },
    DefaultAgent {
        name: "Brief",
        description: "Turns long texts into concise, bulleted summaries.",
        icon: "FileText",
        instruction: "You are a summarization engine. Your goal is to take input text and \
                      output a structured, bulleted summary capturing the key points. \
                      Do not add conversational filler.",
        category: "productivity",
    },
];
