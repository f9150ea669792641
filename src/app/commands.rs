//! Inbound commands and reporting identities.
//!
//! The remote platform addresses the bridge through typed identifiers, not
//! object identity: an inbound MQTT message is parsed into a
//! [`RelayCommand`] at the adapter boundary and dispatched by the
//! [`CommandRouter`](crate::control::router::CommandRouter) on the tag.

/// Number of persistent relays.
pub const RELAY_COUNT: usize = 2;
/// Number of momentary relays.
pub const MOMENTARY_COUNT: usize = 2;
/// Number of binary sensors.
pub const SENSOR_COUNT: usize = 4;

/// A reporting handle — one boolean state channel on the remote platform.
///
/// Each momentary relay owns a pair: the `Momentary` handle the platform
/// sends commands to, and a `MomentaryState` handle mirroring the physical
/// pin as a plain toggle. Both must always carry the same boolean as the
/// pin itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// Persistent relay `relay1`/`relay2` (index 0..[`RELAY_COUNT`]).
    Relay(usize),
    /// Momentary command handle `momentary1`/`momentary2`.
    Momentary(usize),
    /// Paired persistent reflection of a momentary relay's pin.
    MomentaryState(usize),
    /// Binary sensor `digital_a1`..`digital_a4` (index 0..[`SENSOR_COUNT`]).
    Sensor(usize),
}

/// Command address: which actuator an inbound message is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTarget {
    /// A persistent relay toggle.
    Relay(usize),
    /// A momentary pulse request.
    Momentary(usize),
}

/// A decoded inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayCommand {
    pub target: CommandTarget,
    /// The boolean payload as sent by the remote UI. For momentary targets
    /// this is echoed back as the acknowledgment but does not select the
    /// action (see `momentary_pulse_on_any_payload`).
    pub on: bool,
}
