//! Rolling-window rate pacing
//!
//! Computes the delay before the next send is permitted under an
//! "N sends per rolling window" limit, purely from the send-event log.
//! Because nothing but the log is consulted, pacing is resume-safe across
//! restarts: there is no counter to reset or checkpoint to trust.
//!
//! The lookback is an index into the lifetime event log (the event `limit`
//! sends behind the newest), not a true time-window scan. With interleaved
//! campaigns this is equivalent as long as the log is append-only and
//! chronological, which the ledger guarantees.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::types::SendEvent;

/// Default sender-wide limit: 1000 sends per window
pub const DEFAULT_SEND_LIMIT: usize = 1000;

/// Default rolling window: 24 hours
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Compute how long to wait before the next send is permitted
///
/// - If at most `limit` sends exist in the lifetime log, the quota is not yet
///   exhausted and the wait is zero.
/// - Otherwise the event `limit` sends behind the newest is inspected: once
///   the window has rolled past it the wait is zero; until then the wait is
///   the remaining time for it to leave the window.
///
/// `events` must be ordered oldest first, as the ledger appends them. A
/// negative computed wait cannot occur under correct bookkeeping and is
/// clamped to zero with a warning.
#[must_use]
pub fn wait_before_next_send(
    events: &[SendEvent],
    limit: usize,
    window: Duration,
    now: DateTime<Utc>,
) -> Duration {
    if events.len() <= limit {
        return Duration::ZERO;
    }

    let pivot = &events[events.len() - 1 - limit];

    let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
    let cutoff_ms = now.timestamp_millis().saturating_sub(window_ms);

    // The window has already rolled past the pivot event
    if pivot.time.timestamp_millis() < cutoff_ms {
        return Duration::ZERO;
    }

    let ready_ms = pivot.time.timestamp_millis().saturating_add(window_ms);
    let wait_ms = ready_ms - now.timestamp_millis();

    u64::try_from(wait_ms).map_or_else(
        |_| {
            tracing::warn!(
                wait_ms,
                "Computed negative pacing wait, clamping to zero (bookkeeping anomaly)"
            );
            Duration::ZERO
        },
        Duration::from_millis,
    )
}
