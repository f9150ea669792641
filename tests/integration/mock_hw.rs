//! Mock port implementations for integration tests.
//!
//! Records every pin write and state report so tests can assert on the
//! full history without touching real GPIO or a broker.

use relaynode::app::commands::{Entity, RelayCommand};
use relaynode::app::ports::{
    IndicatorPort, LinkPort, LinkStatus, RelayPort, SensorPort, SessionPort, StateReporter,
    COMMAND_BATCH,
};
use relaynode::error::LinkError;
use std::collections::{HashMap, VecDeque};

// ── MockGpio ──────────────────────────────────────────────────

/// Pin bank: records output writes in order and serves scripted input
/// levels (default low).
pub struct MockGpio {
    pub writes: Vec<(i32, bool)>,
    pub inputs: HashMap<i32, bool>,
}

#[allow(dead_code)]
impl MockGpio {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            inputs: HashMap::new(),
        }
    }

    pub fn set_input(&mut self, pin: i32, high: bool) {
        self.inputs.insert(pin, high);
    }

    /// Last level written to `pin`, or `None` if never driven.
    pub fn level(&self, pin: i32) -> Option<bool> {
        self.writes
            .iter()
            .rev()
            .find_map(|&(p, h)| (p == pin).then_some(h))
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPort for MockGpio {
    fn set_level(&mut self, pin: i32, high: bool) {
        self.writes.push((pin, high));
    }
}

impl SensorPort for MockGpio {
    fn read_level(&mut self, pin: i32) -> bool {
        self.inputs.get(&pin).copied().unwrap_or(false)
    }
}

// ── MockSession ───────────────────────────────────────────────

/// Session client double: scripted liveness, an injectable inbox, and a
/// recorded outbox of every state report.
pub struct MockSession {
    pub connected: bool,
    pub inbound: VecDeque<RelayCommand>,
    pub reports: Vec<(Entity, bool)>,
}

#[allow(dead_code)]
impl MockSession {
    pub fn new() -> Self {
        Self {
            connected: true,
            inbound: VecDeque::new(),
            reports: Vec::new(),
        }
    }

    pub fn inject(&mut self, cmd: RelayCommand) {
        self.inbound.push_back(cmd);
    }

    /// Reports for one entity, in publish order.
    pub fn reports_for(&self, entity: Entity) -> Vec<bool> {
        self.reports
            .iter()
            .filter_map(|&(e, on)| (e == entity).then_some(on))
            .collect()
    }

    /// Last reported value for one entity.
    pub fn last_report(&self, entity: Entity) -> Option<bool> {
        self.reports_for(entity).last().copied()
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPort for MockSession {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn poll_commands(&mut self) -> heapless::Vec<RelayCommand, COMMAND_BATCH> {
        let mut batch = heapless::Vec::new();
        while !batch.is_full() {
            match self.inbound.pop_front() {
                Some(cmd) => {
                    let _ = batch.push(cmd);
                }
                None => break,
            }
        }
        batch
    }
}

impl StateReporter for MockSession {
    fn report(&mut self, entity: Entity, on: bool) {
        self.reports.push((entity, on));
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Scripted link driver: pops one status per check and one result per
/// association attempt, recording the timestamps set by the test loop.
pub struct MockLink {
    pub statuses: VecDeque<LinkStatus>,
    pub connect_results: VecDeque<Result<(), LinkError>>,
    pub status_calls: Vec<u64>,
    pub connect_calls: Vec<u64>,
    pub now: u64,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self {
            statuses: VecDeque::new(),
            connect_results: VecDeque::new(),
            status_calls: Vec::new(),
            connect_calls: Vec::new(),
            now: 0,
        }
    }

    pub fn script_status(&mut self, status: LinkStatus) {
        self.statuses.push_back(status);
    }

    pub fn script_connect(&mut self, result: Result<(), LinkError>) {
        self.connect_results.push_back(result);
    }
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkPort for MockLink {
    fn status(&mut self) -> LinkStatus {
        self.status_calls.push(self.now);
        self.statuses.pop_front().unwrap_or(LinkStatus::Connected)
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        self.connect_calls.push(self.now);
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    fn rssi(&self) -> Option<i8> {
        Some(-60)
    }
}

// ── MockIndicator ─────────────────────────────────────────────

pub struct MockIndicator {
    pub colours: Vec<(u8, u8, u8)>,
}

#[allow(dead_code)]
impl MockIndicator {
    pub fn new() -> Self {
        Self {
            colours: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<(u8, u8, u8)> {
        self.colours.last().copied()
    }
}

impl Default for MockIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for MockIndicator {
    fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.colours.push((r, g, b));
    }
}
