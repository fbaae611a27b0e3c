//! Wire types for the gateway run endpoint

use crate::generator::GenerationRequest;
use crate::message::MessageRole;
use serde::Serialize;

/// Request body for the gateway run endpoint
#[derive(Debug, Serialize)]
pub struct GatewayRunRequest {
    /// Ordered chat messages
    pub messages: Vec<GatewayMessage>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Message format on the wire
#[derive(Debug, Serialize)]
pub struct GatewayMessage {
    /// Role of the message sender
    pub role: &'static str,
    /// Content of the message
    pub content: String,
}

impl GatewayRunRequest {
    /// Encode a generation request; the system entry carries the industry context.
    #[must_use]
    pub fn from_request(request: &GenerationRequest) -> Self {
        let messages = request
            .messages
            .iter()
            .map(|msg| {
                let content = if msg.role == MessageRole::System {
                    request.profile.system_content(&msg.content)
                } else {
                    msg.content.clone()
                };
                GatewayMessage {
                    role: msg.role.as_str(),
                    content,
                }
            })
            .collect();

        Self {
            messages,
            max_tokens: request.max_tokens,
            temperature: request.profile.temperature,
        }
    }
}
