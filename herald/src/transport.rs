//! Transport wiring for the binary
//!
//! The real delivery client is an external collaborator and not part of this
//! repository; deployments plug their own [`Transport`] into the controller.
//! The default used by the CLI acknowledges sends locally after logging them,
//! which keeps every bit of bookkeeping (ledger, pacing, resume) observable
//! without network side effects.

use async_trait::async_trait;
use herald_dispatch::{Ack, Transport, TransportError};
use herald_ledger::RecipientId;

/// Transport that logs each send and acknowledges it locally
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransport;

#[async_trait]
impl Transport for LoggingTransport {
    async fn send_message(
        &self,
        recipient: &RecipientId,
        text: &str,
    ) -> Result<Ack, TransportError> {
        tracing::info!(recipient = %recipient, chars = text.len(), "Delivering message");
        Ok(Ack::default())
    }
}
