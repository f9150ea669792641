//! Integration tests for the full control cycle: session pump → router →
//! actuators → poller → watchdog, against mock adapters.
//!
//! The scenario tests mirror the bridge's observable contract: what the
//! remote platform sees on the reporting handles and what the relay pins do.

use crate::mock_hw::{MockGpio, MockIndicator, MockLink, MockSession};

use relaynode::app::commands::{CommandTarget, Entity, RelayCommand};
use relaynode::app::ports::LinkStatus;
use relaynode::app::service::{Controller, COLOUR_HEALTHY, COLOUR_LINK_DOWN};
use relaynode::config::SystemConfig;
use relaynode::control::watchdog::ConnectivityState;
use relaynode::error::LinkError;
use relaynode::pins;

struct Rig {
    controller: Controller,
    gpio: MockGpio,
    session: MockSession,
    link: MockLink,
    indicator: MockIndicator,
}

impl Rig {
    fn new() -> Self {
        Self {
            controller: Controller::new(&SystemConfig::default()),
            gpio: MockGpio::new(),
            session: MockSession::new(),
            link: MockLink::new(),
            indicator: MockIndicator::new(),
        }
    }

    fn tick(&mut self, now_ms: u64) {
        self.link.now = now_ms;
        self.controller.tick(
            now_ms,
            &mut self.gpio,
            &mut self.session,
            &mut self.link,
            &mut self.indicator,
        );
    }

    fn run(&mut self, from: u64, to: u64, step: u64) {
        let mut now = from;
        while now <= to {
            self.tick(now);
            now += step;
        }
    }
}

// ── Scenario A: momentary pulse and auto-release ─────────────

#[test]
fn momentary_command_pulses_then_releases_after_window() {
    let mut rig = Rig::new();
    let pin = pins::MOMENTARY_GPIOS[0];

    rig.session.inject(RelayCommand {
        target: CommandTarget::Momentary(0),
        on: true,
    });
    rig.tick(0);

    assert_eq!(rig.gpio.level(pin), Some(true), "output HIGH at t=0");
    assert_eq!(rig.session.last_report(Entity::Momentary(0)), Some(true));
    assert_eq!(rig.session.last_report(Entity::MomentaryState(0)), Some(true));

    rig.tick(999);
    assert_eq!(rig.controller.momentary_active(0), Some(true), "held at t=999");
    assert_eq!(rig.gpio.level(pin), Some(true));

    rig.tick(1001);
    assert_eq!(rig.controller.momentary_active(0), Some(false));
    assert_eq!(rig.gpio.level(pin), Some(false), "output LOW at t=1001");
    assert_eq!(rig.session.last_report(Entity::Momentary(0)), Some(false));
    assert_eq!(
        rig.session.last_report(Entity::MomentaryState(0)),
        Some(false)
    );
}

#[test]
fn reactivation_restarts_the_window() {
    let mut rig = Rig::new();

    rig.session.inject(RelayCommand {
        target: CommandTarget::Momentary(1),
        on: true,
    });
    rig.tick(0);

    rig.session.inject(RelayCommand {
        target: CommandTarget::Momentary(1),
        on: true,
    });
    rig.tick(600);

    // Past the original deadline, inside the restarted one.
    rig.tick(1100);
    assert_eq!(rig.controller.momentary_active(1), Some(true));

    rig.tick(1601);
    assert_eq!(rig.controller.momentary_active(1), Some(false));
}

// ── Ordering contract: pump before timer check ───────────────

#[test]
fn command_pumped_in_step_two_is_seen_by_the_same_ticks_timer_check() {
    let mut rig = Rig::new();

    rig.session.inject(RelayCommand {
        target: CommandTarget::Momentary(0),
        on: true,
    });
    rig.tick(0);

    // A re-activation arriving in the same iteration as the old deadline
    // must win: the router runs (step 2) before the timer check (step 4).
    rig.session.inject(RelayCommand {
        target: CommandTarget::Momentary(0),
        on: true,
    });
    rig.tick(1500);
    assert_eq!(
        rig.controller.momentary_active(0),
        Some(true),
        "restarted window must survive the same-tick deadline check"
    );

    // And the restarted window still releases on schedule.
    rig.tick(2501);
    assert_eq!(rig.controller.momentary_active(0), Some(false));
}

// ── Persistent relays ────────────────────────────────────────

#[test]
fn persistent_relay_tracks_last_command_and_never_times_out() {
    let mut rig = Rig::new();
    let pin = pins::RELAY_GPIOS[0];

    rig.session.inject(RelayCommand {
        target: CommandTarget::Relay(0),
        on: true,
    });
    rig.tick(0);
    assert_eq!(rig.gpio.level(pin), Some(true));
    assert_eq!(rig.session.last_report(Entity::Relay(0)), Some(true));

    // A minute of busy looping: no auto-release, no spurious reports.
    rig.run(10, 60_000, 10);
    assert_eq!(rig.controller.relay_state(0), Some(true));
    assert_eq!(rig.gpio.level(pin), Some(true));
    assert_eq!(
        rig.session.reports_for(Entity::Relay(0)),
        vec![false, true],
        "one post-restart default, one command echo, nothing else"
    );

    rig.session.inject(RelayCommand {
        target: CommandTarget::Relay(0),
        on: false,
    });
    rig.tick(60_010);
    assert_eq!(rig.controller.relay_state(0), Some(false));
    assert_eq!(rig.session.last_report(Entity::Relay(0)), Some(false));
}

// ── Scenario B: sensor polling without deduplication ─────────

#[test]
fn sensor_levels_republished_every_poll_cycle() {
    let mut rig = Rig::new();
    let pin = pins::SENSOR_GPIOS[0];

    rig.tick(0);
    // Line goes HIGH at t=10, between polls.
    rig.gpio.set_input(pin, true);

    rig.tick(30);
    rig.tick(60);

    assert_eq!(
        rig.session.reports_for(Entity::Sensor(0)),
        vec![false, true, true],
        "post-restart default, then HIGH at both polls — no dedup"
    );
    assert_eq!(rig.controller.sensor_last_known(0), Some(true));
}

#[test]
fn poll_count_is_bounded_under_busy_looping() {
    let mut rig = Rig::new();

    // Tick every millisecond for 3 seconds.
    rig.run(0, 3_000, 1);

    // One report per sensor per cycle, plus the post-restart defaults.
    let polls = rig.session.reports_for(Entity::Sensor(0)).len() - 1;
    assert!(
        polls <= 3_000 / 30 + 1,
        "poll count {polls} exceeds ceil(T/30)+1"
    );
    assert!(polls >= 3_000 / 30 - 1, "poller stalled: {polls} cycles");
}

// ── Scenario C: link outage and recovery ─────────────────────

#[test]
fn link_fault_recovers_with_fixed_retry_spacing() {
    let mut rig = Rig::new();

    rig.link.script_status(LinkStatus::Disconnected);
    rig.link.script_connect(Err(LinkError::AssociationFailed));
    rig.link.script_connect(Ok(()));

    rig.run(0, 2_990, 10);
    assert_eq!(rig.controller.connectivity(), ConnectivityState::Unknown);

    // Fault observed at t=3000; the first attempt fails right there.
    rig.tick(3_000);
    assert_eq!(rig.link.connect_calls, vec![3_000]);
    assert_eq!(rig.controller.connectivity(), ConnectivityState::Lost);

    // During the outage the indicator shows the link fault...
    rig.tick(5_000);
    assert_eq!(rig.indicator.current(), Some(COLOUR_LINK_DOWN));

    // ...and the rest of the loop keeps running: a momentary pulse still
    // releases on time while the retry machine waits.
    rig.session.inject(RelayCommand {
        target: CommandTarget::Momentary(0),
        on: true,
    });
    rig.tick(6_000);
    assert_eq!(rig.controller.momentary_active(0), Some(true));
    rig.run(6_010, 7_500, 10);
    assert_eq!(
        rig.controller.momentary_active(0),
        Some(false),
        "momentary deadline must not stall during an outage"
    );

    // Second attempt exactly 10 s after the first succeeds.
    rig.run(7_510, 14_000, 10);
    assert_eq!(rig.link.connect_calls, vec![3_000, 13_000]);
    assert_eq!(rig.controller.connectivity(), ConnectivityState::Connected);

    rig.tick(14_010);
    assert_eq!(
        rig.indicator.current(),
        Some(COLOUR_HEALTHY),
        "indicator returns to healthy once reassociated"
    );
}

// ── Session liveness and defaults ────────────────────────────

#[test]
fn defaults_published_once_session_is_up() {
    let mut rig = Rig::new();
    rig.session.connected = false;

    rig.tick(0);
    assert!(
        rig.session.reports.is_empty(),
        "nothing to report before the session is up"
    );

    rig.session.connected = true;
    rig.tick(10);

    // Two relays, two momentary pairs, four sensors — all low.
    assert_eq!(rig.session.reports.len(), 10);
    assert!(rig.session.reports.iter().all(|&(_, on)| !on));

    rig.tick(20);
    assert_eq!(
        rig.session.reports.len(),
        10,
        "defaults are published exactly once"
    );
}

#[test]
fn session_liveness_only_drives_the_indicator() {
    let mut rig = Rig::new();

    // Link healthy, session down: degraded colour, but no association
    // attempt — session recovery is the client's own policy.
    rig.run(0, 3_000, 10);
    assert_eq!(rig.controller.connectivity(), ConnectivityState::Connected);

    rig.session.connected = false;
    rig.tick(3_010);
    assert_ne!(rig.indicator.current(), Some(COLOUR_HEALTHY));
    assert!(rig.link.connect_calls.is_empty());

    rig.session.connected = true;
    rig.tick(3_020);
    assert_eq!(rig.indicator.current(), Some(COLOUR_HEALTHY));
}
