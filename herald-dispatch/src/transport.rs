//! External transport client interface
//!
//! The transport delivers one message to one recipient. Its error type is the
//! only category the engine actively retries, so it distinguishes the
//! sender's own account being throttled (recoverable, retry same recipient)
//! from a recipient that can never be reached (permanent, skip and continue).

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use herald_ledger::RecipientId;
use thiserror::Error;

/// Acknowledgement of one accepted send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    /// Transport-assigned message identifier, when the transport provides one
    pub message_id: Option<String>,
}

/// Classified transport failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The sender's account is globally throttled server-side, independent of
    /// the engine's own pacing model. Recoverable: cool down and retry the
    /// same recipient.
    #[error("Sender account is rate limited")]
    AccountRateLimited,

    /// The recipient is unreachable (unfollowed, blocked, or otherwise
    /// ineligible). Permanent: never retried, never recorded as a send.
    #[error("Recipient rejected: {0}")]
    RecipientRejected(String),

    /// Anything else. Treated as recoverable and retried after a cooldown.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether the engine may retry the same recipient after this error
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::RecipientRejected(_))
    }
}

/// Client that delivers one message to one recipient
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `text` to `recipient`
    ///
    /// # Errors
    /// A classified [`TransportError`]; see the variant docs for how the
    /// engine reacts to each
    async fn send_message(&self, recipient: &RecipientId, text: &str)
    -> Result<Ack, TransportError>;
}

/// Scripted transport for tests
///
/// Outcomes can be queued per recipient; once a recipient's queue is
/// exhausted (or was never scripted) every send succeeds. All successful
/// sends are recorded for assertions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedInner>>,
}

#[derive(Debug, Default)]
struct ScriptedInner {
    scripts: ahash::AHashMap<RecipientId, VecDeque<Result<Ack, TransportError>>>,
    sent: Vec<(RecipientId, String)>,
    calls: usize,
}

impl ScriptedTransport {
    /// Create a transport where every send succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `outcomes` for `recipient`, consumed in order
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned
    pub fn script(
        &self,
        recipient: impl Into<RecipientId>,
        outcomes: impl IntoIterator<Item = Result<Ack, TransportError>>,
    ) {
        self.inner
            .lock()
            .expect("ScriptedTransport mutex poisoned")
            .scripts
            .entry(recipient.into())
            .or_default()
            .extend(outcomes);
    }

    /// Queue a permanently failing recipient
    pub fn reject(&self, recipient: impl Into<RecipientId>, reason: &str) {
        let recipient = recipient.into();
        // A rejected recipient stays rejected however often it is asked
        self.script(
            recipient,
            std::iter::repeat_n(
                Err(TransportError::RecipientRejected(reason.to_string())),
                64,
            ),
        );
    }

    /// Messages delivered so far, in send order
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned
    #[must_use]
    pub fn sent(&self) -> Vec<(RecipientId, String)> {
        self.inner
            .lock()
            .expect("ScriptedTransport mutex poisoned")
            .sent
            .clone()
    }

    /// Total number of `send_message` invocations, including failures
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner
            .lock()
            .expect("ScriptedTransport mutex poisoned")
            .calls
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send_message(
        &self,
        recipient: &RecipientId,
        text: &str,
    ) -> Result<Ack, TransportError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| TransportError::Other("ScriptedTransport mutex poisoned".into()))?;
        inner.calls += 1;

        let outcome = inner
            .scripts
            .get_mut(recipient)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Ack::default()));

        if outcome.is_ok() {
            inner.sent.push((recipient.clone(), text.to_string()));
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unscripted_sends_succeed_and_are_recorded() {
        let transport = ScriptedTransport::new();
        let recipient = RecipientId::new("r1");

        let ack = transport
            .send_message(&recipient, "hello")
            .await
            .expect("success");
        assert_eq!(ack, Ack::default());
        assert_eq!(transport.sent(), vec![(recipient, "hello".to_string())]);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_outcomes_are_consumed_in_order() {
        let transport = ScriptedTransport::new();
        let recipient = RecipientId::new("r1");
        transport.script(
            recipient.clone(),
            [Err(TransportError::AccountRateLimited), Ok(Ack::default())],
        );

        assert_eq!(
            transport.send_message(&recipient, "hello").await,
            Err(TransportError::AccountRateLimited)
        );
        assert!(transport.send_message(&recipient, "hello").await.is_ok());
        // Only the successful send is recorded
        assert_eq!(transport.sent().len(), 1);
    }

    #[test]
    fn recoverability_classification() {
        assert!(TransportError::AccountRateLimited.is_recoverable());
        assert!(TransportError::Other("timeout".into()).is_recoverable());
        assert!(!TransportError::RecipientRejected("blocked".into()).is_recoverable());
    }
}
