use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };

use super::{ build_http_client, ensure_success, require_api_key, ChatClient, CompletionResponse };
use crate::error::ChatError;
use crate::llm::LlmConfig;
use crate::models::chat::PromptMessage;

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct GroqRequest {
    messages: Vec<GroqMessage>,
    model: String,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

impl GroqChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = require_api_key(config, "Groq")?;
        let http = build_http_client(Some(&api_key), config.request_timeout)?;

        Ok(Self {
            http,
            model: config.completion_model.clone().unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            base_url: config.base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<CompletionResponse, ChatError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let req = GroqRequest {
            messages: messages
                .iter()
                .map(|m| GroqMessage { role: m.role.to_string(), content: m.content.clone() })
                .collect(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        debug!("Sending {} messages to Groq model {}", messages.len(), self.model);
        let resp = self.http.post(&url).json(&req).send().await?;
        let resp = ensure_success(resp, "Groq").await?.json::<GroqResponse>().await?;

        let content = resp.choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::ProviderRejected {
                status: None,
                message: "No response from Groq API".to_string(),
            })?
            .message.content;

        Ok(CompletionResponse { response: content })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
