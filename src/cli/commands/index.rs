//! Index command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{IndexOutcome, Orchestrator};
use anyhow::Result;

/// Run the index command.
pub async fn run_index(video: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    Output::info(&format!("Indexing {}", video));

    match orchestrator.ensure_indexed(video).await? {
        IndexOutcome::Indexed {
            chunks_indexed,
            segments_indexed,
        } => {
            Output::success(&format!(
                "Stored {} chunks and {} segments",
                chunks_indexed, segments_indexed
            ));
        }
        IndexOutcome::AlreadyIndexed { vector_count } => {
            Output::info(&format!(
                "Already indexed ({} vectors), nothing to do",
                vector_count
            ));
        }
    }

    Ok(())
}
