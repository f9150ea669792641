//! Control-cycle orchestrator.
//!
//! [`Controller`] owns the command router, the actuator and sensor
//! collections, and the connectivity watchdog, and runs them in a fixed
//! order each iteration. All I/O flows through port traits injected at
//! call sites, making the entire cycle testable with mock adapters.
//!
//! ```text
//!  SessionPort ──▶ ┌──────────────────────────────┐ ──▶ StateReporter
//!  SensorPort ───▶ │          Controller          │ ──▶ RelayPort
//!  LinkPort ─────▶ │ router · poller · watchdog   │ ──▶ IndicatorPort
//!                  └──────────────────────────────┘
//! ```
//!
//! The step order is a design contract: a command pumped in step 2 is
//! reflected on the pins and reporting handles before the same iteration's
//! timer check in step 4.

use log::{info, warn};

use crate::app::commands::{Entity, MOMENTARY_COUNT, RELAY_COUNT, SENSOR_COUNT};
use crate::app::ports::{
    IndicatorPort, LinkPort, RelayPort, SensorPort, SessionPort, StateReporter,
};
use crate::config::SystemConfig;
use crate::control::momentary::MomentaryActuator;
use crate::control::poller::SensorPoller;
use crate::control::router::{CommandRouter, PersistentRelay};
use crate::control::watchdog::{ConnectivityState, ConnectivityWatchdog};
use crate::pins;

// ───────────────────────────────────────────────────────────────
// Status indicator palette
// ───────────────────────────────────────────────────────────────

pub const COLOUR_HEALTHY: (u8, u8, u8) = (0, 160, 0);
pub const COLOUR_SESSION_DOWN: (u8, u8, u8) = (200, 120, 0);
pub const COLOUR_CONNECTING: (u8, u8, u8) = (0, 0, 200);
pub const COLOUR_LINK_DOWN: (u8, u8, u8) = (200, 0, 0);

/// Map `{connectivity, session liveness}` onto the indicator channels.
pub fn indicator_colour(link: ConnectivityState, session_up: bool) -> (u8, u8, u8) {
    match link {
        ConnectivityState::Connected if session_up => COLOUR_HEALTHY,
        ConnectivityState::Connected => COLOUR_SESSION_DOWN,
        ConnectivityState::Unknown | ConnectivityState::Connecting => COLOUR_CONNECTING,
        ConnectivityState::Lost => COLOUR_LINK_DOWN,
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller {
    router: CommandRouter,
    relays: [PersistentRelay; RELAY_COUNT],
    momentaries: [MomentaryActuator; MOMENTARY_COUNT],
    poller: SensorPoller,
    watchdog: ConnectivityWatchdog,
    session_was_up: bool,
    defaults_published: bool,
}

impl Controller {
    pub fn new(config: &SystemConfig) -> Self {
        let relays = core::array::from_fn(|i| PersistentRelay::new(i, pins::RELAY_GPIOS[i]));
        let momentaries = core::array::from_fn(|i| {
            MomentaryActuator::new(i, pins::MOMENTARY_GPIOS[i], config.momentary_window_ms)
        });
        Self {
            router: CommandRouter::new(config),
            relays,
            momentaries,
            poller: SensorPoller::new(config),
            watchdog: ConnectivityWatchdog::new(config),
            session_was_up: false,
            defaults_published: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the initial network join; the first attempt fires on the next
    /// tick and retries run until the station is associated.
    pub fn begin_association(&mut self, now_ms: u64) {
        self.watchdog.begin_association(now_ms);
    }

    /// Publish the post-restart defaults (relays off, sensors low) so the
    /// remote platform reflects them before the first poll or command.
    /// Runs automatically on the first session-up transition.
    pub fn publish_defaults(&mut self, reporter: &mut impl StateReporter) {
        for i in 0..RELAY_COUNT {
            reporter.report(Entity::Relay(i), false);
        }
        for i in 0..MOMENTARY_COUNT {
            reporter.report(Entity::Momentary(i), false);
            reporter.report(Entity::MomentaryState(i), false);
        }
        for i in 0..SENSOR_COUNT {
            reporter.report(Entity::Sensor(i), false);
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle.
    ///
    /// The `session` parameter satisfies **both** [`SessionPort`] and
    /// [`StateReporter`] — the session client is also the reporting
    /// channel, and a single bound avoids a double mutable borrow.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl RelayPort + SensorPort),
        session: &mut (impl SessionPort + StateReporter),
        link: &mut impl LinkPort,
        indicator: &mut impl IndicatorPort,
    ) {
        // 1. Session liveness drives the indicator every iteration; the
        //    session client reconnects on its own policy.
        let session_up = session.is_connected();
        if session_up != self.session_was_up {
            if session_up {
                info!("session: broker connection established");
            } else {
                warn!("session: broker connection lost");
            }
            self.session_was_up = session_up;
        }
        if session_up && !self.defaults_published {
            self.publish_defaults(session);
            self.defaults_published = true;
        }
        let (r, g, b) = indicator_colour(self.watchdog.state(), session_up);
        indicator.set_rgb(r, g, b);

        // 2. Pump inbound commands through the router.
        for cmd in session.poll_commands() {
            self.router.dispatch(
                cmd,
                now_ms,
                &mut self.relays,
                &mut self.momentaries,
                hw,
                session,
            );
        }

        // 3. Sensor poll, if due.
        self.poller.poll(now_ms, hw, session);

        // 4. Momentary deadlines.
        for actuator in &mut self.momentaries {
            actuator.tick(now_ms, hw, session);
        }

        // 5. Connectivity supervision, if due.
        self.watchdog.tick(now_ms, link);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn connectivity(&self) -> ConnectivityState {
        self.watchdog.state()
    }

    pub fn relay_state(&self, index: usize) -> Option<bool> {
        self.relays.get(index).map(PersistentRelay::state)
    }

    pub fn momentary_active(&self, index: usize) -> Option<bool> {
        self.momentaries.get(index).map(MomentaryActuator::is_active)
    }

    pub fn sensor_last_known(&self, index: usize) -> Option<bool> {
        self.poller.last_known(index)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
