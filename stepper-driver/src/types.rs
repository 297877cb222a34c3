//! Domain types carried by the controller's registers: selection masks and
//! configuration enums. Every type here knows how to travel as a register
//! payload; invalid wire values surface as protocol errors, never panics.

use bitflags::bitflags;
use harp_protocol::{PayloadBuf, PayloadType, PayloadValue, ProtocolError};

bitflags! {
    /// Selects any combination of the four motor channels.
    pub struct MotorFlags: u8 {
        const MOTOR0 = 0x01;
        const MOTOR1 = 0x02;
        const MOTOR2 = 0x04;
        const MOTOR3 = 0x08;
    }
}

bitflags! {
    /// Selects any combination of the three quadrature encoder inputs.
    pub struct EncoderFlags: u8 {
        const ENCODER0 = 0x01;
        const ENCODER1 = 0x02;
        const ENCODER2 = 0x04;
    }
}

bitflags! {
    /// Selects any combination of the four digital input lines.
    pub struct DigitalInputFlags: u8 {
        const INPUT0 = 0x01;
        const INPUT1 = 0x02;
        const INPUT2 = 0x04;
        const INPUT3 = 0x08;
    }
}

macro_rules! flags_payload {
    ($ty:ty) => {
        impl PayloadValue for $ty {
            const PAYLOAD_TYPE: PayloadType = PayloadType::U8;

            fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
                // Reserved bits are dropped rather than rejected, so newer
                // firmware remains readable.
                Ok(Self::from_bits_truncate(u8::from_payload(payload)?))
            }

            fn write_payload(&self, out: &mut PayloadBuf) {
                out.push(self.bits());
            }
        }
    };
}

flags_payload!(MotorFlags);
flags_payload!(EncoderFlags);
flags_payload!(DigitalInputFlags);

macro_rules! payload_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident = $value:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant = $value, )*
        }

        impl core::convert::TryFrom<u8> for $name {
            type Error = ProtocolError;

            fn try_from(byte: u8) -> Result<Self, ProtocolError> {
                $(
                    if byte == $value {
                        return Ok(Self::$variant);
                    }
                )*
                Err(ProtocolError::InvalidPayloadValue(byte))
            }
        }

        impl PayloadValue for $name {
            const PAYLOAD_TYPE: PayloadType = PayloadType::U8;

            fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
                use core::convert::TryInto;
                u8::from_payload(payload)?.try_into()
            }

            fn write_payload(&self, out: &mut PayloadBuf) {
                out.push(*self as u8);
            }
        }
    };
}

payload_enum! {
    /// How a motor generates its step waveform.
    MotorOperationMode {
        /// Smooth waveform tuned for low audible noise.
        QuietMode = 0,
        /// Waveform tuned for fast, dynamic movements.
        DynamicMovements = 1,
    }
}

payload_enum! {
    /// Microstep subdivision of a full step.
    MicrostepResolution {
        Microstep8 = 0,
        Microstep16 = 1,
        Microstep32 = 2,
        Microstep64 = 3,
    }
}

payload_enum! {
    /// How much the run current is reduced while the motor holds position.
    HoldCurrentReduction {
        NoReduction = 0,
        ReductionTo50Percent = 1,
        ReductionTo25Percent = 2,
        ReductionTo12Percent = 3,
    }
}

payload_enum! {
    /// What the encoder registers report.
    EncoderMode {
        /// Absolute position since the last reset.
        Position = 0,
        /// Displacement since the previous sample.
        Displacement = 1,
    }
}

payload_enum! {
    /// Rate of the periodic encoder events.
    EncoderSamplingRate {
        Rate50Hz = 0,
        Rate100Hz = 1,
        Rate200Hz = 2,
        Rate250Hz = 3,
        Rate500Hz = 4,
    }
}

payload_enum! {
    /// What a digital input edge does, besides emitting an event.
    InputOperationMode {
        EventOnly = 0,
        StopMotor0 = 1,
        StopMotor1 = 2,
        StopMotor2 = 3,
        StopMotor3 = 4,
    }
}

payload_enum! {
    /// Which edge of a digital input is significant.
    TriggerMode {
        RisingEdge = 0,
        FallingEdge = 1,
    }
}

payload_enum! {
    /// State of the emergency stop contact that halts all motors.
    EmergencyStopMode {
        /// The stop engages when the contact closes.
        ClosedState = 0,
        /// The stop engages when the contact opens.
        OpenState = 1,
    }
}

payload_enum! {
    /// Rate of the periodic accumulated-steps events.
    AccumulatedStepsSamplingRate {
        Disabled = 0,
        Rate10Hz = 1,
        Rate50Hz = 2,
        Rate100Hz = 3,
    }
}

payload_enum! {
    /// Whether the controller is allowed to drive its motors.
    DeviceStateMode {
        Disabled = 0,
        Enabled = 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::TryFrom;
    use test_case::test_case;

    #[test_case(0, MicrostepResolution::Microstep8)]
    #[test_case(3, MicrostepResolution::Microstep64)]
    fn enum_from_byte(byte: u8, expected: MicrostepResolution) {
        assert_eq!(MicrostepResolution::try_from(byte), Ok(expected));
    }

    #[test]
    fn enum_rejects_unknown_discriminant() {
        assert_eq!(
            EncoderSamplingRate::try_from(5),
            Err(ProtocolError::InvalidPayloadValue(5))
        );
        assert_eq!(
            MotorOperationMode::from_payload(&[9]),
            Err(ProtocolError::InvalidPayloadValue(9))
        );
    }

    #[test]
    fn enum_payload_round_trip() {
        let mut out = PayloadBuf::new();
        HoldCurrentReduction::ReductionTo25Percent.write_payload(&mut out);
        assert_eq!(&out[..], &[2]);
        assert_eq!(
            HoldCurrentReduction::from_payload(&out),
            Ok(HoldCurrentReduction::ReductionTo25Percent)
        );
    }

    #[test]
    fn flags_ignore_reserved_bits() {
        assert_eq!(
            MotorFlags::from_payload(&[0xf5]),
            Ok(MotorFlags::MOTOR0 | MotorFlags::MOTOR2)
        );
    }

    #[test]
    fn flags_payload_round_trip() {
        let flags = DigitalInputFlags::INPUT1 | DigitalInputFlags::INPUT3;
        let mut out = PayloadBuf::new();
        flags.write_payload(&mut out);
        assert_eq!(&out[..], &[0x0a]);
        assert_eq!(DigitalInputFlags::from_payload(&out), Ok(flags));
    }
}
