//! Delete command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcript::extract_video_id;
use anyhow::Result;

/// Run the delete command.
pub async fn run_delete(video_id: Option<&str>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    match video_id {
        Some(input) => {
            let video_id = extract_video_id(input)
                .ok_or_else(|| anyhow::anyhow!("Not a YouTube URL or video id: {}", input))?;
            let removed = orchestrator.delete_video(&video_id).await?;
            Output::success(&format!("Deleted {} vectors for {}", removed, video_id));
        }
        None => {
            orchestrator.delete_index().await?;
            Output::success("Deleted all indexed vectors.");
        }
    }

    Ok(())
}
