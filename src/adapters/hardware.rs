//! Hardware adapter — bridges real GPIO to the domain port traits.
//!
//! This is the only module in the system that touches physical pins. On
//! non-espidf targets the pin bank is simulated in memory so the control
//! loop and adapter tests run on the host.

use crate::app::ports::{RelayPort, SensorPort};
use crate::drivers::hw_init;

/// Concrete adapter over the relay outputs and sensor inputs.
pub struct HardwareAdapter {
    #[cfg(not(target_os = "espidf"))]
    sim: SimPins,
}

impl HardwareAdapter {
    /// Configure pin directions and pulls; fails if the GPIO matrix
    /// rejects the configuration.
    pub fn new() -> Result<Self, hw_init::HwInitError> {
        hw_init::init_peripherals()?;
        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            sim: SimPins::new(),
        })
    }

    /// Simulation hook: drive a sensor line from a test or host harness.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_sensor_level(&mut self, pin: i32, high: bool) {
        self.sim.set_input(pin, high);
    }

    /// Simulation hook: observe the last level written to an output.
    #[cfg(not(target_os = "espidf"))]
    pub fn output_level(&self, pin: i32) -> bool {
        self.sim.output(pin)
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl RelayPort for HardwareAdapter {
    fn set_level(&mut self, pin: i32, high: bool) {
        #[cfg(target_os = "espidf")]
        hw_init::gpio_write(pin, high);

        #[cfg(not(target_os = "espidf"))]
        self.sim.set_output(pin, high);
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_level(&mut self, pin: i32) -> bool {
        #[cfg(target_os = "espidf")]
        {
            hw_init::gpio_read(pin)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.sim.input(pin)
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
struct SimPins {
    outputs: std::collections::HashMap<i32, bool>,
    inputs: std::collections::HashMap<i32, bool>,
}

#[cfg(not(target_os = "espidf"))]
impl SimPins {
    fn new() -> Self {
        Self {
            outputs: std::collections::HashMap::new(),
            inputs: std::collections::HashMap::new(),
        }
    }

    fn set_output(&mut self, pin: i32, high: bool) {
        self.outputs.insert(pin, high);
    }

    fn output(&self, pin: i32) -> bool {
        self.outputs.get(&pin).copied().unwrap_or(false)
    }

    fn set_input(&mut self, pin: i32, high: bool) {
        self.inputs.insert(pin, high);
    }

    fn input(&self, pin: i32) -> bool {
        // Default-low until a harness drives the line.
        self.inputs.get(&pin).copied().unwrap_or(false)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
