//! Answer generation support: prompt assembly over transcript and
//! retrieved context.

mod prompt;

pub use prompt::{build_prompt, format_retrieved, serialize_subtitles, PromptParams};

use crate::llm::Provider;
use serde::Deserialize;

/// A question about one video, as received at the API boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    /// The user's question.
    pub text: String,
    /// The video to answer about.
    #[serde(rename = "videoId")]
    pub video_id: String,
    /// Caller-supplied context (notes, retrieved passages, free text).
    #[serde(default)]
    pub context: Option<String>,
    /// Who is asking; enables `@noteN` mention expansion.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    /// LLM backend; defaults to the configured provider.
    #[serde(default)]
    pub provider: Option<Provider>,
    /// Timestamp the user is currently looking at, in seconds.
    #[serde(rename = "referenceTimestamp", default)]
    pub reference_timestamp: Option<f64>,
    /// Description attached to the reference timestamp.
    #[serde(rename = "referenceDescription", default)]
    pub reference_description: Option<String>,
    /// Answer language; defaults to English.
    #[serde(default)]
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_request_minimal_body() {
        let req: AnswerRequest = serde_json::from_str(
            r#"{ "text": "What is useState?", "videoId": "dpw9EHDh2bM" }"#,
        )
        .unwrap();
        assert_eq!(req.video_id, "dpw9EHDh2bM");
        assert!(req.provider.is_none());
        assert!(req.context.is_none());
    }

    #[test]
    fn test_answer_request_full_body() {
        let req: AnswerRequest = serde_json::from_str(
            r#"{
                "text": "Explain this part",
                "videoId": "dpw9EHDh2bM",
                "context": "my notes",
                "userId": "student@example.com",
                "provider": "groq",
                "referenceTimestamp": 135.5,
                "referenceDescription": "hook intro",
                "language": "norwegian"
            }"#,
        )
        .unwrap();
        assert_eq!(req.provider, Some(Provider::Groq));
        assert_eq!(req.reference_timestamp, Some(135.5));
    }
}
