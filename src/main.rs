//! RelayNode Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single-threaded control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter   MqttSession       WifiLink    Esp32Time   │
//! │  (Relay+Sensor)    (Session+Report)  (LinkPort)  (clock)     │
//! │  StatusLed (IndicatorPort)                                   │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ──────────────────     │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              Controller (pure logic)                   │  │
//! │  │  Router · Momentary timers · Poller · Watchdog         │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
pub mod pins;

pub mod app;
mod adapters;
mod control;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info};

use adapters::device_id;
use adapters::hardware::HardwareAdapter;
use adapters::mqtt::MqttSession;
use adapters::time::Esp32TimeAdapter;
use adapters::wifi::WifiLink;
use app::service::Controller;
use config::SystemConfig;
use drivers::status_led::StatusLed;

// ── Compile-time credentials ──────────────────────────────────
//
// Baked in at build time the same way the original board kept them in a
// secrets header; set via `[env]` in `.cargo/config.toml` or the shell.

const WIFI_SSID: &str = match option_env!("RELAYNODE_WIFI_SSID") {
    Some(s) => s,
    None => "",
};
const WIFI_PASSWORD: &str = match option_env!("RELAYNODE_WIFI_PASSWORD") {
    Some(s) => s,
    None => "",
};
const BROKER_URL: &str = match option_env!("RELAYNODE_BROKER_URL") {
    Some(s) => s,
    None => "mqtt://homeassistant.local:1883",
};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("RelayNode v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = SystemConfig::default();
    config
        .wifi_ssid
        .push_str(WIFI_SSID)
        .map_err(|()| anyhow::anyhow!("SSID exceeds 32 bytes"))?;
    config
        .wifi_password
        .push_str(WIFI_PASSWORD)
        .map_err(|()| anyhow::anyhow!("password exceeds 64 bytes"))?;
    config
        .broker_url
        .push_str(BROKER_URL)
        .map_err(|()| anyhow::anyhow!("broker URL exceeds 64 bytes"))?;

    // ── 3. Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    let dev_id = device_id::device_id(&mac);
    info!(
        "Device: {} '{}' firmware {}",
        dev_id,
        config.device_name,
        env!("CARGO_PKG_VERSION")
    );

    // ── 4. Hardware bring-up ──────────────────────────────────
    let mut hw = match HardwareAdapter::new() {
        Ok(hw) => hw,
        Err(e) => {
            // Pin config failure is critical — log and halt until a
            // physical reset.
            error!("HAL init failed: {} — halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    // ── 5. Transport bring-up (absence is fatal) ──────────────
    #[cfg(target_os = "espidf")]
    let mut link = {
        use esp_idf_hal::peripherals::Peripherals;
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let esp_wifi = match EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs)) {
            Ok(wifi) => wifi,
            Err(e) => {
                error!("WiFi module init failed: {} — halting", e);
                #[allow(clippy::empty_loop)]
                loop {}
            }
        };
        WifiLink::new(BlockingWifi::wrap(esp_wifi, sysloop)?)
    };
    #[cfg(not(target_os = "espidf"))]
    let mut link = WifiLink::new();

    link.set_credentials(config.wifi_ssid.as_str(), config.wifi_password.as_str())
        .map_err(|e| anyhow::anyhow!("wifi credentials: {e}"))?;

    // ── 6. Session client ─────────────────────────────────────
    // The client keeps the broker session alive on its own policy; the
    // control loop only observes liveness.
    let mut session = MqttSession::new(&config, dev_id.as_str())
        .map_err(|e| anyhow::anyhow!("mqtt session: {e}"))?;

    // ── 7. Controller + peripherals ───────────────────────────
    let mut led = StatusLed::new();
    let time = Esp32TimeAdapter::new();
    let mut controller = Controller::new(&config);

    // Initial network join runs through the same retry machine that
    // handles outage recovery.
    controller.begin_association(time.now_ms());

    info!("System ready. Entering control loop.");

    // ── 8. Control loop ───────────────────────────────────────
    loop {
        let now_ms = time.now_ms();
        controller.tick(now_ms, &mut hw, &mut session, &mut link, &mut led);

        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.control_loop_interval_ms,
        )));
    }
}
