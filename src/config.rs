//! System configuration parameters
//!
//! All tunable parameters for the RelayNode bridge. Values are fixed at
//! boot; there is no runtime persistence — a restart always comes back up
//! with these defaults plus compile-time credentials.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Identity ---
    /// Device name, used as the MQTT topic root.
    pub device_name: heapless::String<32>,

    // --- WiFi ---
    /// Station SSID.
    pub wifi_ssid: heapless::String<32>,
    /// Station passphrase (empty for an open network).
    pub wifi_password: heapless::String<64>,

    // --- MQTT ---
    /// Broker URL, e.g. `mqtt://192.168.1.10:1883`.
    pub broker_url: heapless::String<64>,

    // --- Timing ---
    /// Sensor poll cadence (milliseconds).
    pub sensor_poll_interval_ms: u32,
    /// Link-status check cadence (milliseconds).
    pub link_check_interval_ms: u32,
    /// Spacing between association retries while the link is down.
    pub link_retry_interval_ms: u32,
    /// Momentary actuation window before auto-release (milliseconds).
    pub momentary_window_ms: u32,
    /// Control loop iteration period (milliseconds). Must stay small
    /// relative to `momentary_window_ms` — it bounds release latency.
    pub control_loop_interval_ms: u32,

    // --- Behaviour ---
    /// When `true` (stock behaviour), a command on a momentary target pulses
    /// the relay for both ON and OFF payloads, modelling a push-button.
    /// When `false`, only an ON payload pulses.
    pub momentary_pulse_on_any_payload: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        let _ = device_name.push_str("relaynode_01");

        Self {
            device_name,
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
            broker_url: heapless::String::new(),

            // Timing
            sensor_poll_interval_ms: 30,
            link_check_interval_ms: 3_000,
            link_retry_interval_ms: 10_000,
            momentary_window_ms: 1_000,
            control_loop_interval_ms: 10,

            // Behaviour
            momentary_pulse_on_any_payload: true,
        }
    }
}
