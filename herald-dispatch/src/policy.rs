//! Pacing and retry policy configuration
//!
//! Both policies are plain data injected into the engine, so scheduling
//! behaviour is configurable and testable independently of it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sender-wide rolling-window pacing configuration
///
/// The default matches the external service limit the original deployment
/// ran against: 1000 sends per rolling 24 hours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Maximum sends inside one window
    #[serde(default = "defaults::send_limit")]
    pub send_limit: usize,

    /// Window length in seconds
    #[serde(default = "defaults::window_secs")]
    pub window_secs: u64,
}

impl PacingConfig {
    /// Window length as a `Duration`
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            send_limit: defaults::send_limit(),
            window_secs: defaults::window_secs(),
        }
    }
}

/// Retry policy for recoverable transport failures
///
/// The engine waits a fixed cooldown and retries the same recipient. By
/// default retries are unbounded, matching the original behaviour of waiting
/// out server-side throttling indefinitely; a bound can be set to surface
/// persistent failures instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CooldownPolicy {
    /// Fixed delay between attempts, in seconds
    #[serde(default = "defaults::cooldown_secs")]
    pub cooldown_secs: u64,

    /// Maximum attempts per recipient; `None` retries forever
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl CooldownPolicy {
    /// Cooldown as a `Duration`
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Whether another attempt is permitted after `attempts` failures
    #[must_use]
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts < max)
    }
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            cooldown_secs: defaults::cooldown_secs(),
            max_attempts: None,
        }
    }
}

mod defaults {
    pub const fn send_limit() -> usize {
        herald_ledger::DEFAULT_SEND_LIMIT
    }

    pub const fn window_secs() -> u64 {
        24 * 60 * 60
    }

    pub const fn cooldown_secs() -> u64 {
        60
    }
}
