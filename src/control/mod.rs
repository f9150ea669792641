//! Control components — the timing and state-synchronization core.
//!
//! Each component is a plain struct ticked by the
//! [`Controller`](crate::app::service::Controller) with an explicit
//! monotonic timestamp; none of them owns a clock, a pin, or a socket.

pub mod momentary;
pub mod poller;
pub mod router;
pub mod watchdog;
