use crate::error::{GenerationError, Result};
use crate::gateway::{config::GatewayConfig, shape::ResponseShape, types::GatewayRunRequest};
use crate::generator::{GenerationRequest, Generator};
use crate::util::preview;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Maximum body characters echoed into logs
const LOG_BODY_PREVIEW: usize = 500;

/// AI gateway client
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Create a new gateway client
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.config.timeout.as_secs())
        } else {
            GenerationError::Network(e.without_url().to_string())
        }
    }

    /// Send a request to the run endpoint
    async fn send_request(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.config.endpoint(&request.profile.model);
        let body = GatewayRunRequest::from_request(request);

        debug!(
            "Sending request to gateway: model={}, messages={}",
            request.profile.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header(
                self.config.auth_header.as_str(),
                format!("Bearer {}", self.config.api_token),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!(
            "Gateway replied: status={}, body={}",
            status,
            preview(&text, LOG_BODY_PREVIEW)
        );

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                body = %preview(&text, LOG_BODY_PREVIEW),
                "Gateway returned an error status"
            );
            return Err(GenerationError::Status(status.as_u16()));
        }

        ResponseShape::classify_text(&text).into_text()
    }
}

#[async_trait::async_trait]
impl Generator for GatewayClient {
    fn name(&self) -> &str {
        "gateway"
    }

    #[instrument(skip(self, request), fields(model = %request.profile.model, max_tokens = request.max_tokens))]
    async fn complete(&self, request: GenerationRequest) -> Result<String> {
        self.send_request(&request).await
    }
}
