//! Async client for Harp stepper-motor controller boards.
//!
//! The controller drives up to four stepper motors and watches three
//! quadrature encoders and four digital inputs. Every board setting and
//! every command is a Harp register; [`StepperDriver`] exposes one typed
//! accessor per register over any serial transport implementing the
//! `embedded-io-async` traits, plus [`StepperDriver::poll_event`] for the
//! notifications the board pushes on its own.
//!
//! Framing, payload encoding, and the common core registers live in the
//! `harp-protocol` crate; this crate adds the stepper controller's
//! application registers and their domain types on top.

#![no_std]

pub mod bus;
pub mod events;
pub mod registers;
pub mod types;

pub use bus::{BusError, StepperDriver};
pub use events::StepperEvent;
pub use harp_protocol::{HarpTimestamp, Timestamped};

/// Product code the board reports in its WhoAmI register.
pub const WHO_AM_I: u16 = 1130;
