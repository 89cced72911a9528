//! Top-level campaign runner
//!
//! Wires the engine to its concrete collaborators and runs one campaign to
//! completion. All failures propagate as `Result`; deciding process exit
//! behaviour is left to `main`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use herald_dispatch::{Campaign, DispatchEngine, RunSummary, SystemClock};
use herald_ledger::FileStore;

use crate::{manifest::ManifestDirectory, transport::LoggingTransport};

/// Inputs for one campaign run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the campaign JSON document
    pub campaign: PathBuf,
    /// Path to the recipient manifest JSON
    pub recipients: PathBuf,
    /// Sender identity; namespaces the ledger
    pub sender: String,
    /// Directory holding ledger files
    pub data_dir: PathBuf,
    /// Force a dry run regardless of what the campaign document says
    pub dry_run: bool,
}

/// Load, validate, and dispatch one campaign
///
/// # Errors
/// On invalid campaign documents, unreadable manifests, or any fatal engine
/// failure (ledger I/O, exhausted bounded retries)
pub async fn run(options: RunOptions) -> anyhow::Result<RunSummary> {
    let text = tokio::fs::read_to_string(&options.campaign)
        .await
        .with_context(|| {
            format!(
                "Failed to read campaign from {}",
                options.campaign.display()
            )
        })?;

    let mut campaign = Campaign::from_json(&text)?;
    if options.dry_run {
        campaign.dry_run = true;
    }

    let mut engine = DispatchEngine::new(
        campaign,
        options.sender,
        Arc::new(ManifestDirectory::new(options.recipients)),
        Arc::new(LoggingTransport),
        Arc::new(FileStore::new(options.data_dir)),
        Arc::new(SystemClock),
    );

    let summary = engine.run().await?;

    tracing::info!(
        sent = summary.sent,
        target = summary.target,
        already_contacted = summary.already_contacted,
        rejected = summary.rejected,
        "Run finished"
    );

    Ok(summary)
}
