// src/session/config.rs

use crate::common::timing;
use core::time::Duration;

/// Timeouts and polling behavior of an [`ImuSession`](super::ImuSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long to wait for a complete reply line after a request is written.
    pub response_timeout: Duration,
    /// Added to the streaming interval to get the per-frame read deadline.
    pub frame_timeout_margin: Duration,
    /// Delay between polls while the transport reports `WouldBlock`.
    pub poll_interval_us: u32,
    /// Upper bound on bytes thrown away when clearing stale input.
    pub stale_drain_limit: usize,
}

impl SessionConfig {
    pub const DEFAULT: SessionConfig = SessionConfig {
        response_timeout: timing::RESPONSE_TIMEOUT,
        frame_timeout_margin: timing::FRAME_TIMEOUT_MARGIN,
        poll_interval_us: timing::IO_POLL_INTERVAL_US,
        stale_drain_limit: 4096,
    };

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_frame_timeout_margin(mut self, margin: Duration) -> Self {
        self.frame_timeout_margin = margin;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
