//! The dispatch engine
//!
//! Drives recipient-by-recipient sending for one validated campaign:
//! consults the pacing calculator for timing, skips recipients the ledger
//! already records, invokes the transport, classifies the outcome, persists
//! the ledger, and advances. Strictly sequential; exactly one recipient is
//! in flight at any time, by design, because the sender-wide rate limit is
//! shared across everything the account does.
//!
//! The engine owns the ledger for the lifetime of one run. It does not
//! implement cross-process mutual exclusion: a second concurrent run against
//! the same sender and dry-run mode is unsafe and must be prevented by the
//! caller.

use std::sync::Arc;

use herald_ledger::{BlobStore, Ledger, LedgerKey, RecipientId, wait_before_next_send};

use crate::{
    campaign::Campaign,
    clock::Clock,
    directory::Directory,
    error::DispatchError,
    policy::{CooldownPolicy, PacingConfig},
    selector::select,
    transport::{Transport, TransportError},
};

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, not yet run
    Idle,
    /// Fetching and selecting recipients
    Selecting,
    /// In the per-recipient send loop
    Dispatching,
    /// Terminal: the run finished (including "nothing to do")
    Completed,
    /// Terminal: fatal ledger, directory, or retry-policy failure
    Aborted,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The send loop ran to completion
    Completed,
    /// Selection yielded no recipients; the loop was never entered
    NothingToDo,
}

/// Result of one completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Messages accepted by the transport (or simulated in dry-run)
    pub sent: usize,
    /// Effective send target for this run
    pub target: usize,
    /// Recipients excluded up front because the ledger already records them
    pub already_contacted: usize,
    /// Recipients skipped on permanent rejection; never counted as sent
    pub rejected: usize,
}

/// The campaign dispatch state machine
#[derive(Debug)]
pub struct DispatchEngine {
    campaign: Campaign,
    sender: String,
    directory: Arc<dyn Directory>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    pacing: PacingConfig,
    cooldown: CooldownPolicy,
    state: EngineState,
    sent: usize,
    target: usize,
}

impl DispatchEngine {
    /// Create an engine with default pacing and cooldown policies
    #[must_use]
    pub fn new(
        campaign: Campaign,
        sender: impl Into<String>,
        directory: Arc<dyn Directory>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            campaign,
            sender: sender.into(),
            directory,
            transport,
            store,
            clock,
            pacing: PacingConfig::default(),
            cooldown: CooldownPolicy::default(),
            state: EngineState::Idle,
            sent: 0,
            target: 0,
        }
    }

    /// Replace the pacing configuration
    #[must_use]
    pub const fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replace the cooldown policy
    #[must_use]
    pub const fn with_cooldown(mut self, cooldown: CooldownPolicy) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Run the campaign to completion
    ///
    /// Resumable by construction: the recipient pointer is derived fresh each
    /// run from the ledger's already-contacted exclusion, so restarting after
    /// a crash simply re-selects the remaining recipients and continues.
    ///
    /// # Errors
    /// Fatal configuration, ledger, or directory failures, or an exhausted
    /// bounded retry policy. Progress so far is logged before aborting.
    pub async fn run(&mut self) -> Result<RunSummary, DispatchError> {
        let result = self.dispatch().await;

        match &result {
            Ok(summary) => {
                self.state = EngineState::Completed;
                tracing::info!(
                    campaign = %self.campaign.campaign_id,
                    sent = summary.sent,
                    target = summary.target,
                    "Campaign complete"
                );
            }
            Err(error) => {
                self.state = EngineState::Aborted;
                tracing::error!(
                    campaign = %self.campaign.campaign_id,
                    sent = self.sent,
                    target = self.target,
                    %error,
                    "Campaign aborted"
                );
            }
        }

        result
    }

    async fn dispatch(&mut self) -> Result<RunSummary, DispatchError> {
        self.state = EngineState::Selecting;

        tracing::info!(
            campaign = %self.campaign.campaign_id,
            dry_run = self.campaign.dry_run,
            "Beginning campaign"
        );

        let key = LedgerKey::new(self.sender.clone(), self.campaign.dry_run);
        let mut ledger = Ledger::load(self.store.as_ref(), &key).await?;

        tracing::info!(sender = %self.sender, "Obtaining recipients");
        let recipients = self.directory.fetch_recipients(&self.sender).await?;

        let selection = select(&self.campaign, &ledger, recipients);
        self.target = selection.target;

        if selection.is_empty() {
            tracing::info!(
                campaign = %self.campaign.campaign_id,
                "No eligible recipients, nothing to do"
            );
            return Ok(RunSummary {
                outcome: RunOutcome::NothingToDo,
                sent: 0,
                target: selection.target,
                already_contacted: selection.already_contacted,
                rejected: 0,
            });
        }

        self.state = EngineState::Dispatching;
        tracing::info!(target = self.target, "Preparing to contact recipients");

        let mut rejected = 0usize;

        for recipient in &selection.recipients {
            if self.sent >= self.target {
                break;
            }

            self.pace(&ledger).await;

            tracing::info!(
                recipient = %recipient.display_name,
                "Sending {} of {}",
                self.sent + 1,
                self.target
            );

            if self.attempt_send(&recipient.id).await? {
                ledger
                    .record_send(
                        self.store.as_ref(),
                        &key,
                        self.campaign.campaign_id.clone(),
                        recipient.id.clone(),
                        self.clock.now(),
                    )
                    .await?;
                self.sent += 1;
            } else {
                rejected += 1;
            }
        }

        Ok(RunSummary {
            outcome: RunOutcome::Completed,
            sent: self.sent,
            target: self.target,
            already_contacted: selection.already_contacted,
            rejected,
        })
    }

    /// Wait until the rolling-window limit permits the next send
    ///
    /// Pacing always uses the full historical event log across all campaigns,
    /// because the limit belongs to the sender account, not the campaign.
    async fn pace(&self, ledger: &Ledger) {
        let wait = wait_before_next_send(
            ledger.events(),
            self.pacing.send_limit,
            self.pacing.window(),
            self.clock.now(),
        );

        if wait.is_zero() {
            return;
        }

        let resume_at = self.clock.now()
            + chrono::Duration::from_std(wait).unwrap_or_else(|_| chrono::Duration::zero());
        tracing::info!(
            wait_secs = wait.as_secs(),
            %resume_at,
            "Hit send rate limit, pausing until the window rolls"
        );

        self.clock.sleep(wait).await;
    }

    /// Attempt to deliver to one recipient, retrying recoverable failures
    ///
    /// Returns `Ok(true)` when the send was accepted (or simulated in
    /// dry-run), `Ok(false)` when the recipient was permanently rejected.
    async fn attempt_send(&self, recipient: &RecipientId) -> Result<bool, DispatchError> {
        let mut attempts: u32 = 0;

        loop {
            if self.campaign.dry_run {
                tracing::debug!(recipient = %recipient, "Dry run, skipping transport call");
                return Ok(true);
            }

            match self
                .transport
                .send_message(recipient, &self.campaign.message)
                .await
            {
                Ok(_) => return Ok(true),
                Err(TransportError::RecipientRejected(reason)) => {
                    tracing::info!(
                        recipient = %recipient,
                        reason,
                        "Recipient rejected, skipping without retry"
                    );
                    return Ok(false);
                }
                Err(error) => {
                    attempts += 1;

                    if !self.cooldown.allows_retry(attempts) {
                        return Err(DispatchError::RetriesExhausted {
                            recipient: recipient.clone(),
                            attempts,
                            last_error: error.to_string(),
                        });
                    }

                    match &error {
                        TransportError::AccountRateLimited => tracing::warn!(
                            recipient = %recipient,
                            cooldown_secs = self.cooldown.cooldown().as_secs(),
                            "Unexpectedly hit transport rate limit, waiting before retrying"
                        ),
                        _ => tracing::warn!(
                            recipient = %recipient,
                            %error,
                            cooldown_secs = self.cooldown.cooldown().as_secs(),
                            "Unexpected transport error, retrying after cooldown"
                        ),
                    }

                    self.clock.sleep(self.cooldown.cooldown()).await;
                }
            }
        }
    }
}
