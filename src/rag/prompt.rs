//! Prompt assembly for the streaming answer.

use crate::config::Prompts;
use crate::transcript::TranscriptSegment;
use crate::vector_store::VectorMatch;
use std::collections::HashMap;

/// Serialize subtitles for the prompt as one `[start] text` line per
/// segment, so every citable timestamp is visible to the model.
pub fn serialize_subtitles(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("[{}] {}", s.start.floor() as u64, s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format retrieved passages for inclusion in the prompt context.
pub fn format_retrieved(matches: &[VectorMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "---\n[{}s - {}s] {}\n---",
                m.metadata.start_time.floor() as u64,
                m.metadata.end_time.floor() as u64,
                m.metadata.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parameters for [`build_prompt`].
pub struct PromptParams<'a> {
    pub video_id: &'a str,
    pub question: Option<&'a str>,
    pub user_context: Option<&'a str>,
    pub reference_timestamp: Option<f64>,
    pub reference_description: Option<&'a str>,
    pub language: Option<&'a str>,
}

/// Assemble the full instruction prompt: the fixed citation-format
/// preamble, the serialized subtitles, and the caller-supplied fields.
pub fn build_prompt(
    prompts: &Prompts,
    segments: &[TranscriptSegment],
    params: &PromptParams<'_>,
) -> String {
    let reference = match (params.reference_timestamp, params.reference_description) {
        (Some(ts), Some(desc)) => format!("{}s: {}", ts.floor() as u64, desc),
        (Some(ts), None) => format!("{}s", ts.floor() as u64),
        (None, Some(desc)) => desc.to_string(),
        (None, None) => "none".to_string(),
    };

    let mut vars = HashMap::new();
    vars.insert("video_id".to_string(), params.video_id.to_string());
    vars.insert("subtitles".to_string(), serialize_subtitles(segments));
    vars.insert(
        "context".to_string(),
        params.user_context.unwrap_or("none").to_string(),
    );
    vars.insert("reference".to_string(), reference);
    vars.insert(
        "question".to_string(),
        params.question.unwrap_or("Summarize the video.").to_string(),
    );
    vars.insert(
        "language".to_string(),
        params.language.unwrap_or("english").to_string(),
    );

    let system = prompts.render_with_custom(&prompts.chat.system, &vars);
    let user = prompts.render_with_custom(&prompts.chat.user, &vars);

    format!("{}\n\n{}", system, user)
}
