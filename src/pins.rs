//! GPIO / peripheral pin assignments for the RelayNode main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Relay outputs (active HIGH through the driver transistor bank)
// ---------------------------------------------------------------------------

/// Persistent relays: latched on/off by remote command.
pub const RELAY_GPIOS: [i32; 2] = [1, 2];

/// Momentary relays: pulsed HIGH for the actuation window, then released.
/// Wired to garage-door/gate openers that expect a push-button closure.
pub const MOMENTARY_GPIOS: [i32; 2] = [3, 4];

// ---------------------------------------------------------------------------
// Binary sensor inputs (pull-up; external contact pulls the line LOW)
// ---------------------------------------------------------------------------

pub const SENSOR_GPIOS: [i32; 4] = [5, 6, 7, 8];

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, one GPIO per channel)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
