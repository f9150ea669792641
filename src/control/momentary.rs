//! Momentary actuation — a relay that releases itself.
//!
//! A momentary relay emulates a push-button: a command pulses the output
//! HIGH, and the actuator releases it once the actuation window elapses.
//! Release latency is bounded by the control-loop period, so the loop must
//! spin fast relative to the window.

use log::info;

use crate::app::commands::Entity;
use crate::app::ports::{RelayPort, StateReporter};

// ───────────────────────────────────────────────────────────────
// Activation timer
// ───────────────────────────────────────────────────────────────

/// Minimal per-actuator timer record.
///
/// `activated_on` is meaningful only while `activated` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationTimer {
    activated: bool,
    activated_on: u64,
}

impl ActivationTimer {
    /// Stamp the activation instant. Calling again while active restarts
    /// the window from `now` — it never extends an earlier deadline.
    pub fn activate(&mut self, now_ms: u64) {
        self.activated = true;
        self.activated_on = now_ms;
    }

    pub fn deactivate(&mut self) {
        self.activated = false;
        self.activated_on = 0;
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Whether the window has elapsed. Strictly greater-than: at exactly
    /// `window_ms` elapsed the actuator is still held.
    pub fn expired(&self, now_ms: u64, window_ms: u64) -> bool {
        self.activated && now_ms.saturating_sub(self.activated_on) > window_ms
    }
}

// ───────────────────────────────────────────────────────────────
// Momentary actuator
// ───────────────────────────────────────────────────────────────

/// One momentary relay: a physical output pin, an [`ActivationTimer`], and
/// the pair of reporting handles that must mirror the pin at all times.
pub struct MomentaryActuator {
    index: usize,
    pin: i32,
    window_ms: u64,
    timer: ActivationTimer,
}

impl MomentaryActuator {
    pub fn new(index: usize, pin: i32, window_ms: u32) -> Self {
        Self {
            index,
            pin,
            window_ms: u64::from(window_ms),
            timer: ActivationTimer::default(),
        }
    }

    /// Pulse the relay: pin HIGH, both handles `true`, window restarted.
    pub fn activate(
        &mut self,
        now_ms: u64,
        hw: &mut impl RelayPort,
        reporter: &mut impl StateReporter,
    ) {
        hw.set_level(self.pin, true);
        reporter.report(Entity::Momentary(self.index), true);
        reporter.report(Entity::MomentaryState(self.index), true);
        self.timer.activate(now_ms);
    }

    /// Release the relay: pin LOW, both handles `false`, timer cleared.
    pub fn deactivate(&mut self, hw: &mut impl RelayPort, reporter: &mut impl StateReporter) {
        hw.set_level(self.pin, false);
        reporter.report(Entity::Momentary(self.index), false);
        reporter.report(Entity::MomentaryState(self.index), false);
        self.timer.deactivate();
    }

    /// Release the relay if its window has elapsed. Must run every
    /// control-loop iteration.
    pub fn tick(&mut self, now_ms: u64, hw: &mut impl RelayPort, reporter: &mut impl StateReporter) {
        if self.timer.expired(now_ms, self.window_ms) {
            info!("momentary{}: window elapsed, releasing", self.index + 1);
            self.deactivate(hw, reporter);
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_activated()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
