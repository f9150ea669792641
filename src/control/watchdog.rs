//! Connectivity supervision.
//!
//! Polls the link layer on a fixed cadence and, on a fault status, drives
//! reassociation with a fixed retry spacing until the station is back on
//! the network. The retry machine is non-blocking: it stores its next
//! attempt deadline and is ticked with the rest of the control loop, so
//! momentary deadlines and sensor polls keep running during an outage.
//! (A single `connect()` attempt may still block inside the driver.)
//!
//! There is no backoff growth and no retry cap — the machine runs until
//! success or a physical reset.

use log::{info, warn};

use crate::app::ports::{LinkPort, LinkStatus};
use crate::config::SystemConfig;

/// Supervised link state, driven purely by polling the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    /// Before the first status check or association attempt.
    Unknown,
    /// An association attempt is in flight.
    Connecting,
    /// The station is associated.
    Connected,
    /// The association dropped; waiting out the retry spacing.
    Lost,
}

pub struct ConnectivityWatchdog {
    state: ConnectivityState,
    check_interval_ms: u64,
    retry_interval_ms: u64,
    last_check_at: u64,
    /// `Some` while the retry machine is engaged.
    next_retry_at: Option<u64>,
    attempts: u32,
}

impl ConnectivityWatchdog {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: ConnectivityState::Unknown,
            check_interval_ms: u64::from(config.link_check_interval_ms),
            retry_interval_ms: u64::from(config.link_retry_interval_ms),
            last_check_at: 0,
            next_retry_at: None,
            attempts: 0,
        }
    }

    /// Engage the retry machine with an attempt due immediately. Called at
    /// boot for the initial join; fault recovery uses the same path.
    pub fn begin_association(&mut self, now_ms: u64) {
        self.next_retry_at = Some(now_ms);
        self.attempts = 0;
    }

    /// One supervision step. While the retry machine is idle this checks
    /// the driver status at most once per check interval; while engaged it
    /// attempts association whenever the retry deadline has passed.
    pub fn tick(&mut self, now_ms: u64, link: &mut impl LinkPort) {
        if self.next_retry_at.is_none() {
            if now_ms.saturating_sub(self.last_check_at) < self.check_interval_ms {
                return;
            }
            self.last_check_at = now_ms;
            match link.status() {
                LinkStatus::Connected => {
                    self.state = ConnectivityState::Connected;
                    return;
                }
                // ScanCompleted is emitted by the station driver after a
                // dropped association; treat it as a fault like the others.
                status @ (LinkStatus::ConnectionLost
                | LinkStatus::Disconnected
                | LinkStatus::ScanCompleted) => {
                    warn!("link: fault status {:?}, reassociating", status);
                    self.state = ConnectivityState::Lost;
                    self.begin_association(now_ms);
                }
                LinkStatus::Idle => return,
            }
        }

        let Some(due_at) = self.next_retry_at else {
            return;
        };
        if now_ms < due_at {
            return;
        }

        self.attempts += 1;
        self.state = ConnectivityState::Connecting;
        info!("link: association attempt {}", self.attempts);
        match link.connect() {
            Ok(()) => {
                self.state = ConnectivityState::Connected;
                self.next_retry_at = None;
                self.last_check_at = now_ms;
                info!(
                    "link: associated after {} attempt(s), RSSI {:?} dBm",
                    self.attempts,
                    link.rssi()
                );
            }
            Err(e) => {
                warn!(
                    "link: attempt {} failed ({}), next in {} ms",
                    self.attempts, e, self.retry_interval_ms
                );
                self.state = ConnectivityState::Lost;
                self.next_retry_at = Some(now_ms + self.retry_interval_ms);
            }
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Whether the retry machine is currently engaged.
    pub fn is_reconnecting(&self) -> bool {
        self.next_retry_at.is_some()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
