//! Ask command implementation.

use crate::cli::{format_timestamp, Output};
use crate::citation::{annotate, LinkKind};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::AnswerRequest;
use anyhow::Result;
use futures::StreamExt;
use std::io::Write;

/// Run the ask command.
pub async fn run_ask(
    video: &str,
    question: &str,
    provider: &str,
    api_key: &str,
    context: Option<String>,
    settings: Settings,
) -> Result<()> {
    let provider = provider.parse()?;
    let orchestrator = Orchestrator::new(settings)?;

    let request = AnswerRequest {
        text: question.to_string(),
        video_id: video.to_string(),
        context,
        user_id: None,
        provider: Some(provider),
        reference_timestamp: None,
        reference_description: None,
        language: None,
    };

    let mut stream = orchestrator.answer_stream(&request, api_key).await?;

    let mut answer = String::new();
    let mut stdout = std::io::stdout();

    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                answer.push_str(&fragment);
                print!("{}", fragment);
                stdout.flush()?;
            }
            Err(e) => {
                println!();
                Output::error(&format!("Stream failed: {}", e));
                return Err(e.into());
            }
        }
    }
    println!();

    let citations: Vec<_> = annotate(&answer)
        .into_iter()
        .filter_map(|span| match span.kind {
            LinkKind::Seek(seek) => Some(seek),
            LinkKind::Inert => None,
        })
        .collect();

    if !citations.is_empty() {
        Output::header("Cited moments");
        for seek in &citations {
            Output::kv(
                &format_timestamp(seek.seconds as f64),
                &format!("https://www.youtube.com/watch?v={}&t={}s", seek.video_id, seek.seconds),
            );
        }
    }

    Ok(())
}
