//! Chat-completion-shaped generation service client.
//!
//! Every remote capability (image, video segment, prompt assistance) goes
//! through the same endpoint: POST a model id plus messages, read the first
//! choice's content back. The trait exists so orchestration code can run
//! against a scripted double in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generation endpoint carried over verbatim from the deployed service.
pub const DEFAULT_ENDPOINT: &str = "https://oi-server.onrender.com/chat/completions";

/// Static customer identifier header value.
pub const DEFAULT_CUSTOMER_ID: &str = "cus_T4wsx4yfwoD2kd";

/// Static bearer credential. Hard-coded upstream; kept as the default here.
pub const DEFAULT_API_KEY: &str = "xxx";

/// Errors from a generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode generation response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("generation response contained no choices")]
    MissingContent,

    #[error("no video segments were generated")]
    NoSegments,
}

/// Connection settings for the generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub customer_id: String,
    pub api_key: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            customer_id: DEFAULT_CUSTOMER_ID.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl ServiceConfig {
    /// With a different endpoint URL.
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// With a different customer identifier.
    pub fn with_customer_id(mut self, customer_id: String) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// With a different bearer credential.
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = api_key;
        self
    }
}

/// One chat-completion call: model plus system/user content in, the first
/// choice's content out.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, GenerationError>;
}

/// Real client for the hosted generation endpoint.
pub struct ChatCompletionClient {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ChatCompletionClient {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

#[async_trait]
impl GenerationService for ChatCompletionClient {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("customerId", &self.config.customer_id)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GenerationError::MissingContent)
    }
}

/// Chat-completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// One message in a chat-completion request.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completion response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
