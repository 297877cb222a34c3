#![cfg_attr(not(feature = "std"), no_std)]

//! Sans-io implementation of the Harp binary protocol.
//!
//! Harp devices expose all of their configuration and state as numbered
//! registers. Hosts read and write those registers with short binary frames
//! over a serial link, and devices push register changes back as timestamped
//! event frames. This crate implements the framing, checksumming and payload
//! typing; device crates layer typed register maps on top of it.

#[cfg(feature = "std")]
pub mod client;
mod error;
mod message;
mod payload;
pub mod registers;

pub use error::ProtocolError;
pub use message::{HarpMessage, MessageType, ReadError, DEVICE_PORT, MAX_FRAME};
pub use payload::{HarpTimestamp, PayloadBuf, PayloadType, PayloadValue, Timestamped, MAX_PAYLOAD};
pub use registers::{Register, WritableRegister};
