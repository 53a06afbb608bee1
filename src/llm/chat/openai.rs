use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };

use super::{ build_http_client, ensure_success, require_api_key, ChatClient, CompletionResponse };
use crate::error::ChatError;
use crate::llm::LlmConfig;
use crate::models::chat::PromptMessage;

pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    store: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

impl OpenAIChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = require_api_key(config, "OpenAI")?;
        let http = build_http_client(Some(&api_key), config.request_timeout)?;

        Ok(Self {
            http,
            model: config.completion_model.clone().unwrap_or_else(|| "gpt-4o".to_string()),
            base_url: config.base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<CompletionResponse, ChatError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let req = OpenAIChatRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|m| OpenAIMessage { role: m.role.to_string(), content: m.content.clone() })
                .collect(),
            temperature: self.temperature,
            max_completion_tokens: self.max_tokens,
            store: false,
        };

        debug!("Sending {} messages to OpenAI model {}", messages.len(), self.model);
        let resp = self.http.post(&url).json(&req).send().await?;
        let resp = ensure_success(resp, "OpenAI").await?.json::<OpenAIResponse>().await?;

        let content = resp.choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::ProviderRejected {
                status: None,
                message: "No response from OpenAI API".to_string(),
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
