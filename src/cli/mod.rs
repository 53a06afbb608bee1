use clap::Parser;
use std::time::Duration;

use crate::llm::{ LlmConfig, LlmType };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (groq, openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "groq")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., https://api.groq.com/openai/v1)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider
    #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., llama-3.3-70b-versatile, gpt-4o)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Sampling temperature sent with every completion request.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.7")]
    pub temperature: f32,

    /// Upper bound on generated tokens. Provider default when unset.
    #[arg(long, env = "CHAT_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Seconds to wait for a provider response before giving up on the request.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    // --- General App Args ---
    /// Optional text file replacing the built-in analyst persona.
    #[arg(long, env = "PERSONA_PATH")]
    pub persona_path: Option<String>,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// Origins allowed to call the API from a browser (comma separated).
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://localhost:3001"
    )]
    pub cors_origins: Vec<String>,

    /// Answer a single question on stdout and exit instead of serving HTTP.
    #[arg(long)]
    pub ask: Option<String>,
}

impl Args {
    pub fn llm_config(&self) -> Result<LlmConfig, String> {
        let llm_type: LlmType = self.chat_llm_type.parse().map_err(|e| format!("{}", e))?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("Temperature must be between 0 and 2, got {}", self.temperature));
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be at least one second".to_string());
        }

        Ok(LlmConfig {
            llm_type,
            api_key: Some(self.chat_api_key.clone()).filter(|k| !k.trim().is_empty()),
            completion_model: self.chat_model.clone().filter(|m| !m.trim().is_empty()),
            base_url: self.chat_base_url.clone().filter(|u| !u.trim().is_empty()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["crypto-prediction-agent"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn builds_llm_config_from_flags() {
        let args = parse(
            &[
                "--chat-llm-type",
                "openai",
                "--chat-api-key",
                "sk-1",
                "--chat-model",
                "gpt-4o-mini",
                "--temperature",
                "0.2",
                "--request-timeout-secs",
                "15",
            ]
        );
        let config = args.llm_config().unwrap();

        assert_eq!(config.llm_type, LlmType::OpenAI);
        assert_eq!(config.api_key.as_deref(), Some("sk-1"));
        assert_eq!(config.completion_model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let args = parse(&["--cors-origins", "http://a.test,http://b.test"]);
        assert_eq!(args.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let args = parse(&["--chat-llm-type", "groq", "--temperature", "3.5"]);
        assert!(args.llm_config().is_err());

        let args = parse(&["--chat-llm-type", "groq", "--request-timeout-secs", "0"]);
        assert!(args.llm_config().is_err());

        let args = parse(&["--chat-llm-type", "bard"]);
        assert!(args.llm_config().is_err());
    }
}
