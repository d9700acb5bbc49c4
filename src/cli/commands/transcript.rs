//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcript::require_video_id;
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(video: &str, settings: Settings) -> Result<()> {
    let video_id = require_video_id(video)?;

    let orchestrator = Orchestrator::new(settings)?;

    Output::info(&format!("Fetching transcript for {}", video_id));

    let segments = orchestrator.transcripts().get_transcript(&video_id).await?;

    Output::header(&format!("Transcript ({} segments)", segments.len()));
    for segment in segments.iter() {
        Output::segment(segment.start, &segment.text);
    }

    Ok(())
}
