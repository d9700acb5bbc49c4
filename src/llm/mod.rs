//! Multi-provider streaming completion clients.
//!
//! Each provider binding is constructed with the caller-supplied API key and
//! exposes the same incremental text stream; provider-specific failure
//! shapes are mapped onto the uniform `LekseError` taxonomy at the binding
//! boundary.

mod gemini;
mod groq;
mod openai;

pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use openai::OpenAiClient;

use crate::error::{LekseError, Result};
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// An incremental text stream from a provider.
///
/// Finite and single-pass: it closes normally on completion and yields a
/// final `Err` item on transport or provider failure. Dropping it closes
/// the underlying connection.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Selectable LLM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
    Groq,
}

impl std::str::FromStr for Provider {
    type Err = LekseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            _ => Err(LekseError::Validation(format!("Unknown provider: {}", s))),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAi => write!(f, "openai"),
            Provider::Groq => write!(f, "groq"),
        }
    }
}

/// Trait for streaming completion clients.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a prompt and stream back incremental text fragments.
    async fn stream_completion(&self, prompt: &str) -> Result<CompletionStream>;
}

/// Create a completion client for a provider with a caller-supplied key.
pub fn create_client(
    provider: Provider,
    api_key: &str,
    model: &str,
) -> Box<dyn CompletionClient> {
    match provider {
        Provider::Gemini => Box::new(GeminiClient::new(api_key, model)),
        Provider::OpenAi => Box::new(OpenAiClient::new(api_key, model)),
        Provider::Groq => Box::new(GroqClient::new(api_key, model)),
    }
}

/// Map a provider error message onto the uniform taxonomy.
///
/// Providers do not share a wire-level error schema, so classification
/// falls back to the ecosystem's conventional phrases.
pub(crate) fn classify_provider_message(message: &str) -> LekseError {
    let lowered = message.to_lowercase();

    if lowered.contains("api key") || lowered.contains("api_key") || lowered.contains("unauthorized")
    {
        LekseError::Auth(message.to_string())
    } else if lowered.contains("quota")
        || lowered.contains("rate limit")
        || lowered.contains("too many requests")
    {
        LekseError::RateLimited(message.to_string())
    } else if lowered.contains("permission") || lowered.contains("forbidden") {
        LekseError::PermissionDenied(message.to_string())
    } else if lowered.contains("overloaded")
        || lowered.contains("unavailable")
        || lowered.contains("timed out")
    {
        LekseError::ProviderUnavailable(message.to_string())
    } else {
        LekseError::Unknown(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_classify_provider_message() {
        assert!(matches!(
            classify_provider_message("Invalid API key provided"),
            LekseError::Auth(_)
        ));
        assert!(matches!(
            classify_provider_message("You exceeded your current quota"),
            LekseError::RateLimited(_)
        ));
        assert!(matches!(
            classify_provider_message("Rate limit reached for requests"),
            LekseError::RateLimited(_)
        ));
        assert!(matches!(
            classify_provider_message("Permission denied for model"),
            LekseError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify_provider_message("The model is overloaded"),
            LekseError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            classify_provider_message("something odd happened"),
            LekseError::Unknown(_)
        ));
    }
}
