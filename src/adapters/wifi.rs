//! WiFi station-mode adapter.
//!
//! Implements [`LinkPort`] — the boundary the connectivity watchdog drives.
//! The adapter performs single association attempts; retry pacing and fault
//! detection live in the watchdog, not here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via
//!   `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests, with a
//!   deterministic failure pattern to exercise the retry machine.

#[cfg(target_os = "espidf")]
use log::error;
use log::{info, warn};

use crate::app::ports::{LinkPort, LinkStatus};
use crate::error::LinkError;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), LinkError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(LinkError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(LinkError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), LinkError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(LinkError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiLink {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    /// Simulation: counts `connect()` calls for deterministic failures.
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
}

impl WifiLink {
    #[cfg(target_os = "espidf")]
    pub fn new(
        wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    ) -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            sim_connect_counter: 0,
            sim_connected: false,
        }
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|()| LinkError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| LinkError::InvalidPassword)?;
        info!("wifi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    pub fn ssid(&self) -> &str {
        self.ssid.as_str()
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), LinkError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        });
        self.wifi
            .set_configuration(&config)
            .map_err(|e| {
                error!("wifi: set_configuration failed: {e}");
                LinkError::AssociationFailed
            })?;

        if !self.wifi.is_started().unwrap_or(false) {
            self.wifi.start().map_err(|e| {
                error!("wifi: start failed: {e}");
                LinkError::AssociationFailed
            })?;
        }
        self.wifi.connect().map_err(|e| {
            warn!("wifi: connect failed: {e}");
            LinkError::AssociationFailed
        })?;
        self.wifi.wait_netif_up().map_err(|e| {
            warn!("wifi: netif up wait failed: {e}");
            LinkError::AssociationFailed
        })?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), LinkError> {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        // Every 10th attempt (offset 3) fails to exercise retry spacing.
        if self.sim_connect_counter % 10 == 3 {
            warn!(
                "wifi(sim): simulated association failure (attempt {})",
                self.sim_connect_counter
            );
            return Err(LinkError::AssociationFailed);
        }
        self.sim_connected = true;
        info!(
            "wifi(sim): associated with '{}' (attempt {})",
            self.ssid, self.sim_connect_counter
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_status(&mut self) -> LinkStatus {
        if self.wifi.is_connected().unwrap_or(false) {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_status(&mut self) -> LinkStatus {
        if self.sim_connected {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        use esp_idf_svc::sys::{esp_wifi_sta_get_ap_info, wifi_ap_record_t, ESP_OK};

        let mut ap_info: wifi_ap_record_t = unsafe { core::mem::zeroed() };
        // SAFETY: ap_info is a plain C record filled in by the driver.
        if unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) } == ESP_OK as i32 {
            Some(ap_info.rssi)
        } else {
            None
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        if self.sim_connected { Some(-58) } else { None }
    }
}

// ───────────────────────────────────────────────────────────────
// LinkPort
// ───────────────────────────────────────────────────────────────

impl LinkPort for WifiLink {
    fn status(&mut self) -> LinkStatus {
        self.platform_status()
    }

    fn connect(&mut self) -> Result<(), LinkError> {
        if self.ssid.is_empty() {
            return Err(LinkError::NoCredentials);
        }
        self.platform_connect()?;
        info!(
            "wifi: associated (SSID='{}', RSSI {:?} dBm)",
            self.ssid,
            self.platform_rssi()
        );
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        self.platform_rssi()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
