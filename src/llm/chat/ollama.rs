use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };

use super::{ build_http_client, ensure_success, ChatClient, CompletionResponse };
use crate::error::ChatError;
use crate::llm::LlmConfig;
use crate::models::chat::PromptMessage;

/// Talks to a local Ollama daemon; no credential involved.
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: OllamaMessage,
}

impl OllamaClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        Ok(Self {
            http: build_http_client(None, config.request_timeout)?,
            base_url: config.base_url.clone().unwrap_or_else(|| "http://localhost:11434".into()),
            completion_model: config.completion_model
                .clone()
                .unwrap_or_else(|| "llama3.3".to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<CompletionResponse, ChatError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let req = ChatRequest {
            model: self.completion_model.clone(),
            messages: messages
                .iter()
                .map(|m| OllamaMessage { role: m.role.to_string(), content: m.content.clone() })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        debug!("Sending {} messages to Ollama model {}", messages.len(), self.completion_model);
        let resp = self.http.post(&url).json(&req).send().await?;
        let data = ensure_success(resp, "Ollama").await?.json::<ChatResponse>().await?;
        Ok(CompletionResponse { response: data.message.content })
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
