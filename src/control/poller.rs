//! Periodic binary-sensor polling.
//!
//! Reads every sensor input on a fixed cadence and republishes the raw
//! level unconditionally — no change detection, no debounce. The remote
//! platform is expected to tolerate (or deduplicate) repeated values and
//! raw contact transitions.

use crate::app::commands::{Entity, SENSOR_COUNT};
use crate::app::ports::{SensorPort, StateReporter};
use crate::config::SystemConfig;
use crate::pins;

/// One polled input: its pin and the level seen on the last cycle.
#[derive(Debug, Clone, Copy)]
struct SensorEntry {
    pin: i32,
    last_known: bool,
}

/// Polls all sensors when the cadence is due (`now - last >= interval`).
pub struct SensorPoller {
    entries: [SensorEntry; SENSOR_COUNT],
    interval_ms: u64,
    last_poll_at: u64,
}

impl SensorPoller {
    pub fn new(config: &SystemConfig) -> Self {
        let mut entries = [SensorEntry {
            pin: 0,
            last_known: false,
        }; SENSOR_COUNT];
        for (entry, &pin) in entries.iter_mut().zip(pins::SENSOR_GPIOS.iter()) {
            entry.pin = pin;
        }
        Self {
            entries,
            interval_ms: u64::from(config.sensor_poll_interval_ms),
            last_poll_at: 0,
        }
    }

    /// Run one poll cycle if due. Reads every pin, republishes every level,
    /// and updates the last-known cache.
    pub fn poll(
        &mut self,
        now_ms: u64,
        hw: &mut impl SensorPort,
        reporter: &mut impl StateReporter,
    ) {
        if now_ms.saturating_sub(self.last_poll_at) < self.interval_ms {
            return;
        }
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let level = hw.read_level(entry.pin);
            reporter.report(Entity::Sensor(i), level);
            entry.last_known = level;
        }
        self.last_poll_at = now_ms;
    }

    /// Level seen on the most recent cycle (default-low before the first).
    pub fn last_known(&self, index: usize) -> Option<bool> {
        self.entries.get(index).map(|e| e.last_known)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
