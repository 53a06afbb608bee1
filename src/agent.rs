use crate::cli::Args;
use crate::config::persona::PersonaDirective;
use crate::conversation::ConversationAssembler;
use crate::error::ChatError;
use crate::llm::chat::{ new_client as new_chat_client, ChatClient };
use crate::models::chat::{ ChatResponse, Turn };

use chrono::{ SecondsFormat, Utc };
use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

/// Answers chat requests with the analyst persona.
///
/// Holds only read-only state, so one instance is shared by every request.
#[derive(Clone)]
pub struct PredictionAgent {
    assembler: ConversationAssembler,
    chat_client: Arc<dyn ChatClient>,
}

impl PredictionAgent {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let persona = PersonaDirective::from_optional_path(args.persona_path.as_deref())?;
        let chat_config = args.llm_config()?;
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Type={}, Model={}, BaseURL={}",
            chat_config.llm_type,
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("adapter default")
        );

        Ok(Self::with_client(persona, chat_client))
    }

    pub fn with_client(persona: PersonaDirective, chat_client: Arc<dyn ChatClient>) -> Self {
        Self {
            assembler: ConversationAssembler::new(persona),
            chat_client,
        }
    }

    pub async fn chat(&self, message: &str, history: &[Turn]) -> Result<ChatResponse, ChatError> {
        let messages = self.assembler.assemble(history, message)?;

        let started = Instant::now();
        let completion = match self.chat_client.complete(&messages).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Completion failed after {:?}: {}", started.elapsed(), e);
                return Err(e);
            }
        };
        info!(
            "Completion for {} history turns took {:?} ({} chars)",
            history.len(),
            started.elapsed(),
            completion.response.len()
        );

        Ok(ChatResponse {
            response: completion.response,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::testing::ScriptedChatClient;
    use crate::models::chat::PromptMessage;
    use chrono::DateTime;

    fn agent(client: &Arc<ScriptedChatClient>) -> PredictionAgent {
        PredictionAgent::with_client(PersonaDirective::new("Persona"), client.clone())
    }

    #[tokio::test]
    async fn answers_with_provider_text_and_timestamp() {
        let client = Arc::new(ScriptedChatClient::replying(["Uncertain, markets are volatile."]));
        let resp = agent(&client).chat("Will Bitcoin rise next week?", &[]).await.unwrap();

        assert_eq!(resp.response, "Uncertain, markets are volatile.");
        assert!(DateTime::parse_from_rfc3339(&resp.timestamp).is_ok());
        assert_eq!(
            client.received(),
            vec![
                vec![
                    PromptMessage::system("Persona"),
                    PromptMessage::user("Will Bitcoin rise next week?")
                ]
            ]
        );
    }

    #[tokio::test]
    async fn empty_message_never_reaches_provider() {
        let client = Arc::new(ScriptedChatClient::replying(["unused"]));
        let err = agent(&client).chat("", &[Turn::user("hi")]).await.unwrap_err();

        assert!(matches!(err, ChatError::InvalidRequest(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn identical_requests_are_not_memoized() {
        let client = Arc::new(ScriptedChatClient::replying(["first answer", "second answer"]));
        let agent = agent(&client);
        let history = vec![Turn::user("ETH?"), Turn::assistant("Maybe.")];

        let a = agent.chat("And next month?", &history).await.unwrap();
        let b = agent.chat("And next month?", &history).await.unwrap();

        assert_eq!(a.response, "first answer");
        assert_eq!(b.response, "second answer");
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn provider_failure_leaves_history_untouched() {
        let client = Arc::new(ScriptedChatClient::default());
        client.push(
            Err(ChatError::ProviderUnavailable {
                message: "connection refused".into(),
                timed_out: false,
            })
        );
        let history = vec![Turn::user("BTC?"), Turn::assistant("Volatile.")];
        let snapshot = history.clone();

        let err = agent(&client).chat("Now?", &history).await.unwrap_err();

        assert!(matches!(err, ChatError::ProviderUnavailable { .. }));
        assert_eq!(history, snapshot);
        assert_eq!(client.calls(), 1);
    }
}
