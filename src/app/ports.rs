//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (GPIO, WiFi station, MQTT session, status LED) implement
//! these traits. The [`Controller`](super::service::Controller) consumes
//! them via generics at call sites, so the domain core never touches
//! hardware or sockets directly.

use crate::app::commands::{Entity, RelayCommand};
use crate::error::LinkError;

/// Per-tick inbound command batch. Sized for a worst-case burst; the
/// session client buffers anything beyond it until the next iteration.
pub const COMMAND_BATCH: usize = 8;

// ───────────────────────────────────────────────────────────────
// GPIO ports (domain ↔ physical pins)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain drives relay output pins through this.
pub trait RelayPort {
    /// Drive an output pin (active-high).
    fn set_level(&mut self, pin: i32, high: bool);
}

/// Read-side port: the domain samples sensor input pins through this.
pub trait SensorPort {
    /// Sample a digital input (pull-up; `true` = line HIGH).
    fn read_level(&mut self, pin: i32) -> bool;
}

// ───────────────────────────────────────────────────────────────
// State reporting port (domain → remote platform)
// ───────────────────────────────────────────────────────────────

/// The abstract endpoint through which boolean state reaches the remote
/// platform. Reports are unconditional — deduplication, if any, is the
/// platform's concern.
pub trait StateReporter {
    fn report(&mut self, entity: Entity, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Session port (publish/subscribe client liveness + inbound pump)
// ───────────────────────────────────────────────────────────────

/// The session client managing the broker connection. The core only
/// observes liveness and drains inbound commands; reconnecting the session
/// is the client's own policy.
pub trait SessionPort {
    /// Whether the broker session is currently established.
    fn is_connected(&self) -> bool;

    /// Drain commands received since the last call, oldest first.
    fn poll_commands(&mut self) -> heapless::Vec<RelayCommand, COMMAND_BATCH>;
}

// ───────────────────────────────────────────────────────────────
// Link port (transport layer: WiFi association)
// ───────────────────────────────────────────────────────────────

/// Raw link-layer status as the station driver reports it.
///
/// `ScanCompleted` is listed alongside the true fault states because the
/// station driver emits it after a dropped association; the watchdog treats
/// it as a fault signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Idle,
    Connected,
    ConnectionLost,
    Disconnected,
    ScanCompleted,
}

/// The transport layer. `connect()` performs a single association attempt
/// and may block inside the driver; retry pacing lives in the
/// [`ConnectivityWatchdog`](crate::control::watchdog::ConnectivityWatchdog).
pub trait LinkPort {
    /// Current driver status.
    fn status(&mut self) -> LinkStatus;

    /// One association attempt with the configured network.
    fn connect(&mut self) -> Result<(), LinkError>;

    /// Signal strength in dBm while associated.
    fn rssi(&self) -> Option<i8>;
}

// ───────────────────────────────────────────────────────────────
// Status indicator port (domain → cosmetic output)
// ───────────────────────────────────────────────────────────────

/// Three-channel intensity output driven once per iteration. What the
/// channels are wired to is the adapter's business.
pub trait IndicatorPort {
    fn set_rgb(&mut self, r: u8, g: u8, b: u8);
}
