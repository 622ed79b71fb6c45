//! Stats command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the stats command.
pub async fn run_stats(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let stats = orchestrator.stats().await?;

    Output::header("Index Statistics");
    Output::kv("Total vectors", &stats.total_vectors.to_string());
    Output::kv("Dimension", &stats.dimension.to_string());
    Output::kv("Metric", &stats.metric);

    if stats.namespaces.is_empty() {
        Output::info("No videos indexed yet.");
    } else {
        Output::header("Videos");
        let mut namespaces: Vec<_> = stats.namespaces.iter().collect();
        namespaces.sort_by(|a, b| a.0.cmp(b.0));
        for (video_id, count) in namespaces {
            Output::list_item(&format!("{} ({} vectors)", video_id, count));
        }
    }

    Ok(())
}
