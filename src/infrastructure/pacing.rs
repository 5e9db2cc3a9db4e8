//! Inter-request pacing
//!
//! Product pages live on third-party storefronts that throttle aggressive
//! clients. Requests are spaced by a configurable delay instead of a bare sleep
//! so tests can run with [`PacingPolicy::None`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::debug;

use crate::infrastructure::config::defaults;

/// Delay applied between two consecutive product requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PacingPolicy {
    /// No delay
    None,
    /// Same delay every time
    Fixed { delay_ms: u64 },
    /// Uniformly random delay within `[min_ms, max_ms]`
    Random { min_ms: u64, max_ms: u64 },
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::Fixed {
            delay_ms: defaults::REQUEST_DELAY_MS,
        }
    }
}

impl PacingPolicy {
    /// Delay for the next gap
    pub fn next_delay(&self) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            Self::Random { min_ms, max_ms } => {
                let (low, high) = if min_ms <= max_ms {
                    (min_ms, max_ms)
                } else {
                    (max_ms, min_ms)
                };
                Duration::from_millis(fastrand::u64(low..=high))
            }
        }
    }

    /// Wait out the next gap
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!("Waiting {:?} before next request", delay);
        sleep(delay).await;
    }
}
