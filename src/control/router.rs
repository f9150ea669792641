//! Inbound command dispatch.
//!
//! Maps a decoded command's target identifier to its handler: persistent
//! relays latch the requested boolean, momentary targets pulse. Every
//! handled command is acknowledged by echoing state back on the reporting
//! channel — the remote UI only reflects a new value once the echo arrives.
//! Dispatch is synchronous and non-blocking.

use crate::app::commands::{CommandTarget, Entity, RelayCommand};
use crate::app::ports::{RelayPort, StateReporter};
use crate::config::SystemConfig;
use crate::control::momentary::MomentaryActuator;

// ───────────────────────────────────────────────────────────────
// Persistent relay
// ───────────────────────────────────────────────────────────────

/// A latched relay: holds the last commanded boolean until the next
/// command. Never times out.
pub struct PersistentRelay {
    index: usize,
    pin: i32,
    state: bool,
}

impl PersistentRelay {
    pub fn new(index: usize, pin: i32) -> Self {
        Self {
            index,
            pin,
            state: false,
        }
    }

    /// Latch the relay and echo the new state back.
    pub fn set(&mut self, on: bool, hw: &mut impl RelayPort, reporter: &mut impl StateReporter) {
        hw.set_level(self.pin, on);
        self.state = on;
        reporter.report(Entity::Relay(self.index), on);
    }

    pub fn state(&self) -> bool {
        self.state
    }
}

// ───────────────────────────────────────────────────────────────
// Command router
// ───────────────────────────────────────────────────────────────

/// Dispatches decoded commands onto the actuator collections.
///
/// Targets with an out-of-range index are silently ignored — the adapter
/// layer already drops topics it does not recognise, and an identifier the
/// router does not know is not an error either.
pub struct CommandRouter {
    pulse_on_any_payload: bool,
}

impl CommandRouter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            pulse_on_any_payload: config.momentary_pulse_on_any_payload,
        }
    }

    pub fn dispatch(
        &self,
        cmd: RelayCommand,
        now_ms: u64,
        relays: &mut [PersistentRelay],
        momentaries: &mut [MomentaryActuator],
        hw: &mut impl RelayPort,
        reporter: &mut impl StateReporter,
    ) {
        match cmd.target {
            CommandTarget::Relay(i) => {
                if let Some(relay) = relays.get_mut(i) {
                    relay.set(cmd.on, hw, reporter);
                }
            }
            CommandTarget::Momentary(i) => {
                if let Some(actuator) = momentaries.get_mut(i) {
                    // A momentary control models a push-button: the stock
                    // behaviour pulses no matter which boolean the UI sent.
                    if self.pulse_on_any_payload || cmd.on {
                        actuator.activate(now_ms, hw, reporter);
                    }
                    // Acknowledge with the incoming boolean regardless.
                    reporter.report(Entity::Momentary(i), cmd.on);
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
