pub mod groq;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use log::warn;
use reqwest::header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE };
use reqwest::{ Client as HttpClient, Response, StatusCode };
use std::sync::Arc;
use std::time::Duration;
use super::{ LlmConfig, LlmType };
use self::groq::GroqChatClient;
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use crate::error::ChatError;
use crate::models::chat::PromptMessage;

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

/// One provider round trip per call: no caching, no retries.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<CompletionResponse, ChatError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Groq => {
            let specific_client = GroqChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

/// Pulls the credential out of the config, failing early when a hosted provider has none.
pub(crate) fn require_api_key(config: &LlmConfig, provider: &str) -> Result<String, ChatError> {
    config.api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ChatError::ProviderAuth(format!("{} API key is required", provider)))
}

pub(crate) fn build_http_client(
    api_key: Option<&str>,
    timeout: Duration
) -> Result<HttpClient, ChatError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e|
            ChatError::ProviderAuth(format!("Invalid API key format: {}", e))
        )?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    HttpClient::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| ChatError::ProviderUnavailable {
            message: format!("Failed to build HTTP client: {}", e),
            timed_out: false,
        })
}

/// Body of a failed provider response; a failed read is reported in place of the body.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read provider error body: {}", e);
            format!("<unreadable response body: {}>", e)
        }
    }
}

/// Turns a non-success provider status into the matching error, keeping the body verbatim.
pub(crate) async fn ensure_success(resp: Response, provider: &str) -> Result<Response, ChatError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = error_body(resp.text().await);
    warn!("{} returned HTTP {}: {}", provider, status.as_u16(), body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN =>
            Err(ChatError::ProviderAuth(format!("{} refused the credential: {}", provider, body))),
        _ =>
            Err(ChatError::ProviderRejected {
                status: Some(status.as_u16()),
                message: body,
            }),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_providers_need_a_key() {
        for llm_type in [LlmType::Groq, LlmType::OpenAI] {
            let config = LlmConfig { llm_type, api_key: Some("  ".into()), ..LlmConfig::default() };
            let err = new_client(&config).err().unwrap();
            assert!(matches!(err, ChatError::ProviderAuth(_)));
        }
    }

    #[test]
    fn unreadable_error_body_is_reported() {
        assert_eq!(error_body::<String>(Ok("quota exceeded".into())), "quota exceeded");

        let message = error_body(Err::<String, _>("connection reset mid-body"));
        assert!(message.contains("connection reset mid-body"));
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = LlmConfig { llm_type: LlmType::Ollama, ..LlmConfig::default() };
        let client = new_client(&config).unwrap();
        assert_eq!(client.get_base_url().as_deref(), Some("http://localhost:11434"));
    }
}
