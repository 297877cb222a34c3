//! The typed register trait and the core registers every Harp device
//! carries at addresses 0..=15. Device-specific registers start at 32 and
//! live in the device crates.

use crate::payload::PayloadBuf;
use crate::{PayloadType, PayloadValue, ProtocolError};

/// A device register with a fixed address and payload type.
pub trait Register {
    type Value: PayloadValue;

    const ADDRESS: u8;
}

/// Marker for registers the device accepts writes to.
pub trait WritableRegister: Register {}

/// Reports the device identity as a numeric product code.
pub struct WhoAmI;
impl Register for WhoAmI {
    type Value = u16;
    const ADDRESS: u8 = 0;
}

/// Major hardware version.
pub struct HardwareVersionHigh;
impl Register for HardwareVersionHigh {
    type Value = u8;
    const ADDRESS: u8 = 1;
}

/// Minor hardware version.
pub struct HardwareVersionLow;
impl Register for HardwareVersionLow {
    type Value = u8;
    const ADDRESS: u8 = 2;
}

/// Version of the assembled board.
pub struct AssemblyVersion;
impl Register for AssemblyVersion {
    type Value = u8;
    const ADDRESS: u8 = 3;
}

/// Major version of the Harp core the firmware was built against.
pub struct CoreVersionHigh;
impl Register for CoreVersionHigh {
    type Value = u8;
    const ADDRESS: u8 = 4;
}

/// Minor version of the Harp core the firmware was built against.
pub struct CoreVersionLow;
impl Register for CoreVersionLow {
    type Value = u8;
    const ADDRESS: u8 = 5;
}

/// Major firmware version.
pub struct FirmwareVersionHigh;
impl Register for FirmwareVersionHigh {
    type Value = u8;
    const ADDRESS: u8 = 6;
}

/// Minor firmware version.
pub struct FirmwareVersionLow;
impl Register for FirmwareVersionLow {
    type Value = u8;
    const ADDRESS: u8 = 7;
}

/// Whole seconds of the device clock. Writable, to synchronize the device
/// to the host.
pub struct TimestampSeconds;
impl Register for TimestampSeconds {
    type Value = u32;
    const ADDRESS: u8 = 8;
}
impl WritableRegister for TimestampSeconds {}

/// Sub-second part of the device clock, in 32 µs ticks.
pub struct TimestampMicroseconds;
impl Register for TimestampMicroseconds {
    type Value = u16;
    const ADDRESS: u8 = 9;
}

/// Operation mode and reporting flags of the device.
pub struct OperationControl;
impl Register for OperationControl {
    type Value = OperationControlValue;
    const ADDRESS: u8 = 10;
}
impl WritableRegister for OperationControl {}

/// Resets the device and/or its non-volatile configuration.
pub struct ResetDevice;
impl Register for ResetDevice {
    type Value = u8;
    const ADDRESS: u8 = 11;
}
impl WritableRegister for ResetDevice {}

/// Board serial number.
pub struct SerialNumber;
impl Register for SerialNumber {
    type Value = u16;
    const ADDRESS: u8 = 13;
}
impl WritableRegister for SerialNumber {}

/// Clock generator/repeater configuration for synchronized rigs.
pub struct ClockConfiguration;
impl Register for ClockConfiguration {
    type Value = u8;
    const ADDRESS: u8 = 14;
}
impl WritableRegister for ClockConfiguration {}

/// Fixed offset applied to the device timestamp, in 500 µs units.
pub struct TimestampOffset;
impl Register for TimestampOffset {
    type Value = u8;
    const ADDRESS: u8 = 15;
}
impl WritableRegister for TimestampOffset {}

/// The mode bits of [`OperationControlValue`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum OperationMode {
    /// The device does not emit events.
    Standby = 0,
    /// The device emits events as registers change.
    Active = 1,
    /// Reserved high-rate mode.
    Speed = 2,
}

const MODE_MASK: u8 = 0x03;
const DUMP_REGISTERS: u8 = 0x04;
const MUTE_REPLIES: u8 = 0x08;
const VISUAL_INDICATORS_DISABLED: u8 = 0x10;
const OPERATION_LED: u8 = 0x20;
const HEARTBEAT: u8 = 0x80;

/// Decoded OperationControl register value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OperationControlValue {
    pub mode: OperationMode,
    /// Request a dump of every register as read replies.
    pub dump_registers: bool,
    /// Suppress replies to write commands.
    pub mute_replies: bool,
    /// Turn off the board status LEDs.
    pub visual_indicators_disabled: bool,
    /// Drive the dedicated operation LED.
    pub operation_led: bool,
    /// Emit a TimestampSeconds event every second.
    pub heartbeat: bool,
}

impl OperationControlValue {
    pub fn standby() -> Self {
        Self::with_mode(OperationMode::Standby)
    }

    pub fn active() -> Self {
        Self::with_mode(OperationMode::Active)
    }

    fn with_mode(mode: OperationMode) -> Self {
        Self {
            mode,
            dump_registers: false,
            mute_replies: false,
            visual_indicators_disabled: false,
            operation_led: false,
            heartbeat: false,
        }
    }
}

impl PayloadValue for OperationControlValue {
    const PAYLOAD_TYPE: PayloadType = PayloadType::U8;

    fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        let byte = u8::from_payload(payload)?;
        let mode = match byte & MODE_MASK {
            0 => OperationMode::Standby,
            1 => OperationMode::Active,
            2 => OperationMode::Speed,
            _ => return Err(ProtocolError::InvalidPayloadValue(byte)),
        };
        Ok(Self {
            mode,
            dump_registers: byte & DUMP_REGISTERS != 0,
            mute_replies: byte & MUTE_REPLIES != 0,
            visual_indicators_disabled: byte & VISUAL_INDICATORS_DISABLED != 0,
            operation_led: byte & OPERATION_LED != 0,
            heartbeat: byte & HEARTBEAT != 0,
        })
    }

    fn write_payload(&self, out: &mut PayloadBuf) {
        let mut byte = self.mode as u8;
        if self.dump_registers {
            byte |= DUMP_REGISTERS;
        }
        if self.mute_replies {
            byte |= MUTE_REPLIES;
        }
        if self.visual_indicators_disabled {
            byte |= VISUAL_INDICATORS_DISABLED;
        }
        if self.operation_led {
            byte |= OPERATION_LED;
        }
        if self.heartbeat {
            byte |= HEARTBEAT;
        }
        out.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_register_addresses() {
        assert_eq!(WhoAmI::ADDRESS, 0);
        assert_eq!(FirmwareVersionLow::ADDRESS, 7);
        assert_eq!(OperationControl::ADDRESS, 10);
        assert_eq!(TimestampOffset::ADDRESS, 15);
    }

    #[test]
    fn operation_control_round_trip() {
        let value = OperationControlValue {
            mode: OperationMode::Active,
            dump_registers: false,
            mute_replies: true,
            visual_indicators_disabled: false,
            operation_led: true,
            heartbeat: true,
        };
        let mut out = PayloadBuf::new();
        value.write_payload(&mut out);
        assert_eq!(&out[..], &[0x01 | 0x08 | 0x20 | 0x80]);
        assert_eq!(OperationControlValue::from_payload(&out), Ok(value));
    }

    #[test]
    fn operation_control_rejects_reserved_mode() {
        assert_eq!(
            OperationControlValue::from_payload(&[0x03]),
            Err(ProtocolError::InvalidPayloadValue(0x03))
        );
    }
}
