//! Typed decoding of the controller's event frames.

use crate::bus::BusError;
use crate::registers::*;
use crate::types::*;
use harp_protocol::{HarpMessage, MessageType, PayloadValue, ProtocolError, Timestamped};

/// One event notification pushed by the controller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepperEvent {
    /// Motors that have come to a stop.
    MotorStopped(MotorFlags),
    /// Motors whose driver reported over-voltage.
    MotorOverVoltage(MotorFlags),
    /// Motors whose driver raised an error.
    MotorError(MotorFlags),
    /// Periodic reading of encoder 0.
    Encoder0(i16),
    /// Periodic reading of encoder 1.
    Encoder1(i16),
    /// Periodic reading of encoder 2.
    Encoder2(i16),
    /// Level change on the digital input lines.
    DigitalInputs(DigitalInputFlags),
    /// The controller was enabled or disabled.
    DeviceState(DeviceStateMode),
    /// Periodic step count of motor 0.
    Motor0AccumulatedSteps(i32),
    /// Periodic step count of motor 1.
    Motor1AccumulatedSteps(i32),
    /// Periodic step count of motor 2.
    Motor2AccumulatedSteps(i32),
    /// Periodic step count of motor 3.
    Motor3AccumulatedSteps(i32),
}

impl StepperEvent {
    /// Decodes an event frame into a typed, timestamped event.
    ///
    /// Returns `None` for frames that are not events (read/write replies).
    /// Event frames for an address this device does not emit events from
    /// are an error, as are events missing their timestamp.
    pub fn from_message(
        message: &HarpMessage,
    ) -> Result<Option<Timestamped<Self>>, BusError> {
        if message.message_type != MessageType::Event {
            return Ok(None);
        }
        let payload = message.payload();
        let event = match message.address {
            a if a == MotorStopped::ADDRESS => {
                Self::MotorStopped(MotorFlags::from_payload(payload)?)
            }
            a if a == MotorOverVoltageDetection::ADDRESS => {
                Self::MotorOverVoltage(MotorFlags::from_payload(payload)?)
            }
            a if a == MotorErrorDetection::ADDRESS => {
                Self::MotorError(MotorFlags::from_payload(payload)?)
            }
            a if a == Encoder0::ADDRESS => Self::Encoder0(i16::from_payload(payload)?),
            a if a == Encoder1::ADDRESS => Self::Encoder1(i16::from_payload(payload)?),
            a if a == Encoder2::ADDRESS => Self::Encoder2(i16::from_payload(payload)?),
            a if a == DigitalInputState::ADDRESS => {
                Self::DigitalInputs(DigitalInputFlags::from_payload(payload)?)
            }
            a if a == DeviceState::ADDRESS => {
                Self::DeviceState(DeviceStateMode::from_payload(payload)?)
            }
            a if a == Motor0AccumulatedSteps::ADDRESS => {
                Self::Motor0AccumulatedSteps(i32::from_payload(payload)?)
            }
            a if a == Motor1AccumulatedSteps::ADDRESS => {
                Self::Motor1AccumulatedSteps(i32::from_payload(payload)?)
            }
            a if a == Motor2AccumulatedSteps::ADDRESS => {
                Self::Motor2AccumulatedSteps(i32::from_payload(payload)?)
            }
            a if a == Motor3AccumulatedSteps::ADDRESS => {
                Self::Motor3AccumulatedSteps(i32::from_payload(payload)?)
            }
            address => return Err(BusError::UnknownEvent(address)),
        };
        let time = message
            .time
            .ok_or(BusError::Protocol(ProtocolError::MissingTimestamp))?;
        Ok(Some(Timestamped { time, value: event }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harp_protocol::{HarpTimestamp, PayloadType};

    fn timestamp() -> HarpTimestamp {
        HarpTimestamp::new(100, 2_000)
    }

    #[test]
    fn decodes_encoder_event() {
        let message = HarpMessage::event(Encoder1::ADDRESS, timestamp(), &-1024i16);
        let event = StepperEvent::from_message(&message).unwrap().unwrap();
        assert_eq!(event.time, timestamp());
        assert_eq!(event.value, StepperEvent::Encoder1(-1024));
    }

    #[test]
    fn decodes_motor_stopped_mask() {
        let mask = MotorFlags::MOTOR0 | MotorFlags::MOTOR3;
        let message = HarpMessage::event(MotorStopped::ADDRESS, timestamp(), &mask);
        let event = StepperEvent::from_message(&message).unwrap().unwrap();
        assert_eq!(event.value, StepperEvent::MotorStopped(mask));
    }

    #[test]
    fn ignores_read_replies() {
        let message = HarpMessage::read_reply(Encoder0::ADDRESS, timestamp(), &0i16);
        assert_eq!(StepperEvent::from_message(&message), Ok(None));
    }

    #[test]
    fn rejects_unknown_event_address() {
        let message = HarpMessage::event(200, timestamp(), &0u8);
        assert_eq!(
            StepperEvent::from_message(&message),
            Err(BusError::UnknownEvent(200))
        );
    }

    #[test]
    fn rejects_event_without_timestamp() {
        // A hand-built frame claiming to be an event but missing its time.
        let mut frame = [
            MessageType::Event as u8,
            6,
            Encoder0::ADDRESS,
            255,
            PayloadType::S16.code(),
            0,
            0,
            0,
        ];
        frame[7] = frame[..7].iter().fold(0u8, |sum, &b| sum.wrapping_add(b));
        let message = HarpMessage::parse_exact(&frame).unwrap();
        assert_eq!(
            StepperEvent::from_message(&message),
            Err(BusError::Protocol(ProtocolError::MissingTimestamp))
        );
    }
}
