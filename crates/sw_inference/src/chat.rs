use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sw_core::{Error, LanguageModel, Result};

/// Sampling configuration sent with every completion request. Matches
/// the serving defaults the prompts were tuned against.
#[derive(Debug, Clone)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.95,
            max_tokens: 1024,
            stop: vec!["<|user|>".to_string(), "<|observation|>".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible chat-completions server.
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub sampling: SamplingParams,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_string(),
            api_key: None,
            model: "glm-4-9b-chat".to_string(),
            sampling: SamplingParams::default(),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Chat-completions client over one shared HTTP connection pool. Safe
/// for concurrent calls; the serving side batches requests itself.
pub struct ChatModel {
    client: Client,
    config: ChatConfig,
}

impl ChatModel {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatModel")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &self.config.api_key.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl LanguageModel for ChatModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.sampling.temperature,
            max_tokens: self.config.sampling.max_tokens,
            stop: self.config.sampling.stop.clone(),
        };

        debug!("🤖 completion request ({} prompt chars)", prompt.chars().count());

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Inference("completion response contained no choices".to_string()))
    }
}
