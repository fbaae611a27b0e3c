//! Provisioning directives embedded in model output
//!
//! The model asks for new agents by writing `[CREATE_ANT]` followed by a JSON
//! object. Every marker is scanned, but only the first marker/object span is
//! replaced in the text shown to the user; later spans stay verbatim.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Literal marker that introduces a directive
pub const DIRECTIVE_MARKER: &str = "[CREATE_ANT]";

/// Replacement for the first directive span in the displayed answer
pub const PROVISIONED_CONFIRMATION: &str = "*(Provisioned: Ant created successfully!)*";

/// Default icon for provisioned agents
pub const DEFAULT_DIRECTIVE_ICON: &str = "Sparkles";

/// Default instruction for provisioned agents
pub const DEFAULT_DIRECTIVE_INSTRUCTION: &str = "Strategic assistant.";

/// Default category for provisioned agents
pub const DEFAULT_DIRECTIVE_CATEGORY: &str = "General";

/// Greedy object capture within one marker segment
static OBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("OBJECT_REGEX is a compile-time constant"));

/// Shortest span from a marker to the first closing brace after an opening one
static CLEANUP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[CREATE_ANT\].*?(\{.*?\})").expect("CLEANUP_REGEX is a compile-time constant")
});

/// An agent request parsed from model output, defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDirective {
    /// Agent name (never blank)
    pub name: String,
    /// Declared purpose
    pub description: String,
    /// Icon name
    pub icon: String,
    /// Base instruction
    pub instruction: String,
    /// Catalog category
    pub category: String,
}

/// Result of scanning an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Text to display and persist
    pub cleaned: String,
    /// Well-formed directives, in order of appearance
    pub directives: Vec<RawDirective>,
}

/// Scans model output for provisioning commands
pub trait DirectiveParser: Send + Sync {
    /// Split raw model text into display text and directives
    fn extract(&self, raw: &str) -> Extraction;
}

/// Parser for the `[CREATE_ANT]{...}` text protocol
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerDirectiveParser;

impl MarkerDirectiveParser {
    /// Create a new parser
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parse_segment(segment: &str) -> Option<RawDirective> {
        let capture = OBJECT_REGEX.find(segment)?;
        let value: Value = match serde_json::from_str(capture.as_str()) {
            Ok(value) => value,
            Err(e) => {
                debug!("Discarding malformed directive: {}", e);
                return None;
            }
        };
        let object = value.as_object()?;

        let name = string_field(object, &["name"])?.trim().to_string();
        if name.is_empty() {
            return None;
        }

        Some(RawDirective {
            name,
            description: string_field(object, &["description"]).unwrap_or_default(),
            icon: string_field(object, &["icon"])
                .unwrap_or_else(|| DEFAULT_DIRECTIVE_ICON.to_string()),
            instruction: string_field(object, &["instruction", "system_instruction"])
                .unwrap_or_else(|| DEFAULT_DIRECTIVE_INSTRUCTION.to_string()),
            category: string_field(object, &["category"])
                .unwrap_or_else(|| DEFAULT_DIRECTIVE_CATEGORY.to_string()),
        })
    }
}

fn string_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| object.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

impl DirectiveParser for MarkerDirectiveParser {
    fn extract(&self, raw: &str) -> Extraction {
        if !raw.contains(DIRECTIVE_MARKER) {
            return Extraction {
                cleaned: raw.to_string(),
                directives: Vec::new(),
            };
        }

        let directives: Vec<RawDirective> = raw
            .split(DIRECTIVE_MARKER)
            .skip(1)
            .filter_map(Self::parse_segment)
            .collect();

        let cleaned = CLEANUP_REGEX
            .replace(raw, PROVISIONED_CONFIRMATION)
            .into_owned();

        debug!("Extracted {} directives", directives.len());
        Extraction {
            cleaned,
            directives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> Extraction {
        MarkerDirectiveParser::new().extract(raw)
    }

    #[test]
    fn test_plain_text_passes_through() {
        let out = extract("Just an answer with {braces}.");
        assert_eq!(out.cleaned, "Just an answer with {braces}.");
        assert!(out.directives.is_empty());
    }

    #[test]
    fn test_single_directive() {
        let out = extract(r#"Sure! [CREATE_ANT]{"name":"SEO Bot","description":"x"}"#);
        assert_eq!(out.cleaned, "Sure! *(Provisioned: Ant created successfully!)*");
        assert_eq!(
            out.directives,
            vec![RawDirective {
                name: "SEO Bot".to_string(),
                description: "x".to_string(),
                icon: "Sparkles".to_string(),
                instruction: "Strategic assistant.".to_string(),
                category: "General".to_string(),
            }]
        );
    }

    #[test]
    fn test_multiple_directives_only_first_span_cleaned() {
        let raw = "Creating both.\n[CREATE_ANT]{\"name\":\"A\"}\nand\n[CREATE_ANT]{\"name\":\"B\",\"category\":\"Sales\"}";
        let out = extract(raw);

        let names: Vec<&str> = out.directives.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(out.directives[1].category, "Sales");
        assert_eq!(
            out.cleaned,
            "Creating both.\n*(Provisioned: Ant created successfully!)*\nand\n[CREATE_ANT]{\"name\":\"B\",\"category\":\"Sales\"}"
        );
    }

    #[test]
    fn test_multiline_object_and_instruction_alias() {
        let raw = "[CREATE_ANT]\n{\n  \"name\": \"Copy Ant\",\n  \"system_instruction\": \"Write ads.\",\n  \"icon\": \"Pen\"\n}\nDone.";
        let out = extract(raw);
        assert_eq!(out.directives.len(), 1);
        assert_eq!(out.directives[0].instruction, "Write ads.");
        assert_eq!(out.directives[0].icon, "Pen");
        assert_eq!(out.cleaned, "*(Provisioned: Ant created successfully!)*\nDone.");
    }

    #[test]
    fn test_malformed_directive_is_untouched() {
        let raw = "Here you go [CREATE_ANT]{not json";
        let out = extract(raw);
        assert!(out.directives.is_empty());
        assert_eq!(out.cleaned, raw);
    }

    #[test]
    fn test_unparsable_object_is_dropped_but_span_cleaned() {
        let out = extract("Ok [CREATE_ANT]{name: SEO} bye");
        assert!(out.directives.is_empty());
        assert_eq!(out.cleaned, "Ok *(Provisioned: Ant created successfully!)* bye");
    }

    #[test]
    fn test_missing_or_blank_name_is_discarded() {
        let out = extract(r#"[CREATE_ANT]{"description":"no name"} [CREATE_ANT]{"name":"  "}"#);
        assert!(out.directives.is_empty());

        let out = extract(r#"[CREATE_ANT]{"name": 42}"#);
        assert!(out.directives.is_empty());
    }

    #[test]
    fn test_bad_item_does_not_block_others() {
        let out = extract(r#"[CREATE_ANT]{broken [CREATE_ANT]{"name":"Good"}"#);
        assert_eq!(out.directives.len(), 1);
        assert_eq!(out.directives[0].name, "Good");
    }
}
