//! OpenAI streaming completion binding.

use super::{classify_provider_message, CompletionClient, CompletionStream};
use crate::error::{LekseError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tracing::instrument;

/// Default timeout for provider requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// OpenAI-based streaming completion client.
pub struct OpenAiClient {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    /// Create a client with a caller-supplied API key.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_api_base(api_key, model, None)
    }

    /// Create a client against an OpenAI-compatible endpoint.
    pub fn with_api_base(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: Option<&str>,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key.into());
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: async_openai::Client::with_config(config).with_http_client(http_client),
            model: model.into(),
        }
    }

    pub(crate) fn map_error(error: OpenAIError) -> LekseError {
        match error {
            OpenAIError::ApiError(api) => classify_provider_message(&api.message),
            OpenAIError::Reqwest(e) => LekseError::ProviderUnavailable(e.to_string()),
            other => classify_provider_message(&other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, prompt))]
    async fn stream_completion(&self, prompt: &str) -> Result<CompletionStream> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| LekseError::Unknown(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| LekseError::Unknown(e.to_string()))?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(Self::map_error)?;

        let mapped = stream.filter_map(|item| async move {
            match item {
                Ok(chunk) => chunk
                    .choices
                    .first()
                    .and_then(|c| c.delta.content.clone())
                    .filter(|t| !t.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(Self::map_error(e))),
            }
        });

        Ok(Box::pin(mapped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;

    #[test]
    fn test_api_error_mapping() {
        let err = OpenAIError::ApiError(ApiError {
            message: "Incorrect API key provided: sk-...".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: Some("invalid_api_key".to_string()),
        });
        assert!(matches!(OpenAiClient::map_error(err), LekseError::Auth(_)));

        let err = OpenAIError::ApiError(ApiError {
            message: "You exceeded your current quota".to_string(),
            r#type: None,
            param: None,
            code: None,
        });
        assert!(matches!(OpenAiClient::map_error(err), LekseError::RateLimited(_)));
    }
}
