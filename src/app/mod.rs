//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the RelayNode bridge:
//! command dispatch, momentary actuation timing, sensor polling, and
//! connectivity supervision. All interaction with hardware and the network
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod commands;
pub mod ports;
pub mod service;
