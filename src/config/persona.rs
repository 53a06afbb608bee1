use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;
use thiserror::Error;

pub const DEFAULT_PERSONA: &str = "You are a professional cryptocurrency market analyst and prediction expert.

Your role:
- Analyze cryptocurrency markets (Bitcoin, Ethereum, etc.)
- Provide data-driven predictions based on technical analysis
- Explain market trends in simple terms
- Give balanced perspectives (both bullish and bearish scenarios)
- Always mention that predictions are not financial advice

Your style:
- Simple and easy to understand with bullet points
- Don't use emojis (📈 📉 💡)
- Provide specific timeframes when making predictions
- Always acknowledge market uncertainty

Remember: Never guarantee profits. Markets are unpredictable.";

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Persona file '{0}' is empty")]
    Empty(String),
    #[error("Failed to read persona file '{0}': {1}")]
    IoError(String, #[source] std::io::Error),
}

/// The system instruction every conversation starts with. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaDirective(Arc<str>);

impl PersonaDirective {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersonaError> {
        let display = path.as_ref().display().to_string();
        let content = fs
            ::read_to_string(&path)
            .map_err(|e| PersonaError::IoError(display.clone(), e))?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(PersonaError::Empty(display));
        }
        info!("Loaded persona from '{}' ({} chars)", display, trimmed.len());
        Ok(Self::new(trimmed))
    }

    /// Uses the file at `path` when given, the built-in analyst persona otherwise.
    pub fn from_optional_path(path: Option<&str>) -> Result<Self, PersonaError> {
        match path {
            Some(p) if !p.trim().is_empty() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PersonaDirective {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA)
    }
}
