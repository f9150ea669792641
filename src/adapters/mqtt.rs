//! MQTT session adapter.
//!
//! Implements both [`SessionPort`] (broker liveness, inbound command pump)
//! and [`StateReporter`] (outbound boolean state) — the session client *is*
//! the reporting channel.
//!
//! ## Topic layout
//!
//! ```text
//! <device>/switch/relay1/set            inbound command  (ON/OFF)
//! <device>/switch/relay1/state          outbound state   (ON/OFF)
//! <device>/switch/momentary1/set        inbound pulse request
//! <device>/switch/momentary1/state      outbound command-handle state
//! <device>/switch/momentary1_state/state  outbound paired pin reflection
//! <device>/binary_sensor/digital_a1/state outbound sensor level
//! ```
//!
//! Unknown topics and malformed payloads are dropped without a log line —
//! an identifier the bridge does not carry is not an error.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspMqttClient` with a callback that
//!   decodes inbound publishes onto a channel drained by the control loop.
//!   The client runs its own reconnect policy; the core only observes
//!   liveness.
//! - **all other targets**: an in-memory inbox/outbox for host tests.

use core::fmt::Write as _;

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::commands::{
    CommandTarget, Entity, RelayCommand, MOMENTARY_COUNT, RELAY_COUNT, SENSOR_COUNT,
};
use crate::app::ports::{SessionPort, StateReporter, COMMAND_BATCH};
use crate::config::SystemConfig;
use crate::error::SessionError;

// ───────────────────────────────────────────────────────────────
// Entity naming and topics
// ───────────────────────────────────────────────────────────────

pub const RELAY_NAMES: [&str; RELAY_COUNT] = ["relay1", "relay2"];
pub const MOMENTARY_NAMES: [&str; MOMENTARY_COUNT] = ["momentary1", "momentary2"];
pub const SENSOR_NAMES: [&str; SENSOR_COUNT] =
    ["digital_a1", "digital_a2", "digital_a3", "digital_a4"];

/// Topic buffer: device name (≤32) + the longest fixed suffix.
pub type Topic = heapless::String<96>;

/// Outbound state topic for a reporting handle.
pub fn state_topic(device: &str, entity: Entity) -> Topic {
    let mut t = Topic::new();
    let _ = match entity {
        Entity::Relay(i) => write!(t, "{device}/switch/{}/state", RELAY_NAMES[i]),
        Entity::Momentary(i) => write!(t, "{device}/switch/{}/state", MOMENTARY_NAMES[i]),
        Entity::MomentaryState(i) => {
            write!(t, "{device}/switch/{}_state/state", MOMENTARY_NAMES[i])
        }
        Entity::Sensor(i) => write!(t, "{device}/binary_sensor/{}/state", SENSOR_NAMES[i]),
    };
    t
}

/// Inbound command topic for an addressable target.
pub fn command_topic(device: &str, target: CommandTarget) -> Topic {
    let mut t = Topic::new();
    let _ = match target {
        CommandTarget::Relay(i) => write!(t, "{device}/switch/{}/set", RELAY_NAMES[i]),
        CommandTarget::Momentary(i) => write!(t, "{device}/switch/{}/set", MOMENTARY_NAMES[i]),
    };
    t
}

/// Decode an inbound publish. Returns `None` for foreign topics, state
/// echoes, and payloads that are neither `ON` nor `OFF`.
pub fn parse_command(device: &str, topic: &str, payload: &[u8]) -> Option<RelayCommand> {
    let on = if payload == b"ON" {
        true
    } else if payload == b"OFF" {
        false
    } else {
        return None;
    };
    let name = topic
        .strip_prefix(device)?
        .strip_prefix("/switch/")?
        .strip_suffix("/set")?;
    if let Some(i) = RELAY_NAMES.iter().position(|&n| n == name) {
        return Some(RelayCommand {
            target: CommandTarget::Relay(i),
            on,
        });
    }
    if let Some(i) = MOMENTARY_NAMES.iter().position(|&n| n == name) {
        return Some(RelayCommand {
            target: CommandTarget::Momentary(i),
            on,
        });
    }
    None
}

#[cfg(target_os = "espidf")]
fn payload_bytes(on: bool) -> &'static [u8] {
    if on { b"ON" } else { b"OFF" }
}

// ───────────────────────────────────────────────────────────────
// Session adapter
// ───────────────────────────────────────────────────────────────

pub struct MqttSession {
    device_name: heapless::String<32>,
    #[cfg(target_os = "espidf")]
    client: esp_idf_svc::mqtt::client::EspMqttClient<'static>,
    #[cfg(target_os = "espidf")]
    inbound: std::sync::mpsc::Receiver<RelayCommand>,
    #[cfg(target_os = "espidf")]
    connected: std::sync::Arc<std::sync::atomic::AtomicBool>,
    /// Command-topic subscriptions are (re)established after each connect.
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_inbound: std::collections::VecDeque<RelayCommand>,
    #[cfg(not(target_os = "espidf"))]
    sim_published: Vec<(Entity, bool)>,
}

impl MqttSession {
    /// Connect the session client to the configured broker. The client
    /// maintains the session on its own from here; dropped connections are
    /// retried by its internal policy, not by the control loop.
    #[cfg(target_os = "espidf")]
    pub fn new(config: &SystemConfig, client_id: &str) -> Result<Self, SessionError> {
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let (tx, rx) = std::sync::mpsc::channel();
        let connected = Arc::new(AtomicBool::new(false));
        let conn_flag = Arc::clone(&connected);
        let device = config.device_name.clone();

        let mqtt_config = MqttClientConfiguration {
            client_id: Some(client_id),
            ..Default::default()
        };

        let client = EspMqttClient::new_cb(config.broker_url.as_str(), &mqtt_config, move |event| {
            match event.payload() {
                EventPayload::Connected(_) => {
                    conn_flag.store(true, Ordering::Release);
                }
                EventPayload::Disconnected => {
                    conn_flag.store(false, Ordering::Release);
                }
                EventPayload::Received {
                    topic: Some(topic),
                    data,
                    ..
                } => {
                    if let Some(cmd) = parse_command(device.as_str(), topic, data) {
                        let _ = tx.send(cmd);
                    }
                }
                _ => {}
            }
        })
        .map_err(|e| {
            warn!("mqtt: client init failed: {e}");
            SessionError::ConnectFailed
        })?;

        info!(
            "mqtt: session client started (broker '{}', client id '{}')",
            config.broker_url, client_id
        );
        Ok(Self {
            device_name: config.device_name.clone(),
            client,
            inbound: rx,
            connected,
            subscribed: false,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &SystemConfig, client_id: &str) -> Result<Self, SessionError> {
        info!("mqtt(sim): session client started (client id '{client_id}')");
        Ok(Self {
            device_name: config.device_name.clone(),
            sim_connected: false,
            sim_inbound: std::collections::VecDeque::new(),
            sim_published: Vec::new(),
        })
    }

    #[cfg(target_os = "espidf")]
    fn subscribe_command_topics(&mut self) -> Result<(), SessionError> {
        use esp_idf_svc::mqtt::client::QoS;

        let targets = (0..RELAY_COUNT)
            .map(CommandTarget::Relay)
            .chain((0..MOMENTARY_COUNT).map(CommandTarget::Momentary));
        for target in targets {
            let topic = command_topic(self.device_name.as_str(), target);
            self.client
                .subscribe(topic.as_str(), QoS::AtLeastOnce)
                .map_err(|e| {
                    warn!("mqtt: subscribe '{topic}' failed: {e}");
                    SessionError::SubscribeFailed
                })?;
        }
        info!("mqtt: command topics subscribed");
        Ok(())
    }

    // ── Simulation hooks (host tests) ─────────────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_connected(&mut self, up: bool) {
        self.sim_connected = up;
    }

    /// Feed a raw inbound publish through the real decoder.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_receive(&mut self, topic: &str, payload: &[u8]) {
        if let Some(cmd) = parse_command(self.device_name.as_str(), topic, payload) {
            self.sim_inbound.push_back(cmd);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_published(&self) -> &[(Entity, bool)] {
        &self.sim_published
    }
}

// ───────────────────────────────────────────────────────────────
// SessionPort
// ───────────────────────────────────────────────────────────────

impl SessionPort for MqttSession {
    #[cfg(target_os = "espidf")]
    fn is_connected(&self) -> bool {
        self.connected.load(std::sync::atomic::Ordering::Acquire)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_connected(&self) -> bool {
        self.sim_connected
    }

    #[cfg(target_os = "espidf")]
    fn poll_commands(&mut self) -> heapless::Vec<RelayCommand, COMMAND_BATCH> {
        if self.is_connected() {
            if !self.subscribed && self.subscribe_command_topics().is_ok() {
                self.subscribed = true;
            }
        } else {
            // Re-subscribe once the client reconnects.
            self.subscribed = false;
        }

        let mut batch = heapless::Vec::new();
        while !batch.is_full() {
            match self.inbound.try_recv() {
                Ok(cmd) => {
                    let _ = batch.push(cmd);
                }
                Err(_) => break,
            }
        }
        batch
    }

    #[cfg(not(target_os = "espidf"))]
    fn poll_commands(&mut self) -> heapless::Vec<RelayCommand, COMMAND_BATCH> {
        let mut batch = heapless::Vec::new();
        while !batch.is_full() {
            match self.sim_inbound.pop_front() {
                Some(cmd) => {
                    let _ = batch.push(cmd);
                }
                None => break,
            }
        }
        batch
    }
}

// ───────────────────────────────────────────────────────────────
// StateReporter
// ───────────────────────────────────────────────────────────────

impl StateReporter for MqttSession {
    #[cfg(target_os = "espidf")]
    fn report(&mut self, entity: Entity, on: bool) {
        use esp_idf_svc::mqtt::client::QoS;

        let topic = state_topic(self.device_name.as_str(), entity);
        // enqueue() hands the message to the client task without blocking
        // the control loop.
        if let Err(e) =
            self.client
                .enqueue(topic.as_str(), QoS::AtMostOnce, false, payload_bytes(on))
        {
            warn!("mqtt: state publish '{topic}' failed: {e}");
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn report(&mut self, entity: Entity, on: bool) {
        self.sim_published.push((entity, on));
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
