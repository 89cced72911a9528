use std::path::PathBuf;

use clap::Parser;

/// Dispatch a bulk-message campaign to a ranked, filtered recipient list
/// while respecting the sender-wide rolling rate limit.
#[derive(Debug, Parser)]
#[command(name = "herald", version, about)]
struct Args {
    /// Path to the campaign JSON document
    #[arg(long)]
    campaign: PathBuf,

    /// Path to the recipient manifest JSON
    #[arg(long)]
    recipients: PathBuf,

    /// Sender identity (namespaces the send-history ledger)
    #[arg(long)]
    sender: String,

    /// Directory holding ledger files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Force a dry run: full bookkeeping, no transmission
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    herald::logging::init();

    let args = Args::parse();

    let summary = herald::run(herald::RunOptions {
        campaign: args.campaign,
        recipients: args.recipients,
        sender: args.sender,
        data_dir: args.data_dir,
        dry_run: args.dry_run,
    })
    .await?;

    println!(
        "Campaign finished: sent {} of {} ({} already contacted, {} rejected)",
        summary.sent, summary.target, summary.already_contacted, summary.rejected
    );

    Ok(())
}
