//! The controller's register table.
//!
//! Addresses 0..=15 are the common Harp core registers (see
//! `harp_protocol::registers`); the application registers of the stepper
//! controller start at address 32. Kept in address order, mirroring the
//! device's register map description.

use crate::types::*;
pub use harp_protocol::registers::{Register, WritableRegister};

macro_rules! device_register {
    (
        $(#[$meta:meta])*
        $name:ident, $value:ty, $address:expr, rw
    ) => {
        device_register!($(#[$meta])* $name, $value, $address, ro);
        impl WritableRegister for $name {}
    };
    (
        $(#[$meta:meta])*
        $name:ident, $value:ty, $address:expr, ro
    ) => {
        $(#[$meta])*
        pub struct $name;

        impl Register for $name {
            type Value = $value;
            const ADDRESS: u8 = $address;
        }
    };
}

// --- Channel enable/disable masks ------------------------------------------

device_register! {
    /// Enables the motors selected in the written mask.
    EnableMotors, MotorFlags, 32, rw
}
device_register! {
    /// Disables the motors selected in the written mask.
    DisableMotors, MotorFlags, 33, rw
}
device_register! {
    /// Enables the quadrature encoders selected in the written mask.
    EnableEncoders, EncoderFlags, 34, rw
}
device_register! {
    /// Disables the quadrature encoders selected in the written mask.
    DisableEncoders, EncoderFlags, 35, rw
}
device_register! {
    /// Enables edge detection on the digital inputs selected in the mask.
    EnableInputTriggers, DigitalInputFlags, 36, rw
}
device_register! {
    /// Disables edge detection on the digital inputs selected in the mask.
    DisableInputTriggers, DigitalInputFlags, 37, rw
}

// --- Per-motor configuration -----------------------------------------------

device_register! {
    /// Step waveform generation mode of motor 0.
    Motor0OperationMode, MotorOperationMode, 38, rw
}
device_register! {
    /// Step waveform generation mode of motor 1.
    Motor1OperationMode, MotorOperationMode, 39, rw
}
device_register! {
    /// Step waveform generation mode of motor 2.
    Motor2OperationMode, MotorOperationMode, 40, rw
}
device_register! {
    /// Step waveform generation mode of motor 3.
    Motor3OperationMode, MotorOperationMode, 41, rw
}

device_register! {
    /// Microstep resolution of motor 0.
    Motor0MicrostepResolution, MicrostepResolution, 42, rw
}
device_register! {
    /// Microstep resolution of motor 1.
    Motor1MicrostepResolution, MicrostepResolution, 43, rw
}
device_register! {
    /// Microstep resolution of motor 2.
    Motor2MicrostepResolution, MicrostepResolution, 44, rw
}
device_register! {
    /// Microstep resolution of motor 3.
    Motor3MicrostepResolution, MicrostepResolution, 45, rw
}

device_register! {
    /// Maximum run RMS current of motor 0, in amps.
    Motor0MaximumRunCurrent, f32, 46, rw
}
device_register! {
    /// Maximum run RMS current of motor 1, in amps.
    Motor1MaximumRunCurrent, f32, 47, rw
}
device_register! {
    /// Maximum run RMS current of motor 2, in amps.
    Motor2MaximumRunCurrent, f32, 48, rw
}
device_register! {
    /// Maximum run RMS current of motor 3, in amps.
    Motor3MaximumRunCurrent, f32, 49, rw
}

device_register! {
    /// Hold current reduction of motor 0.
    Motor0HoldCurrentReduction, HoldCurrentReduction, 50, rw
}
device_register! {
    /// Hold current reduction of motor 1.
    Motor1HoldCurrentReduction, HoldCurrentReduction, 51, rw
}
device_register! {
    /// Hold current reduction of motor 2.
    Motor2HoldCurrentReduction, HoldCurrentReduction, 52, rw
}
device_register! {
    /// Hold current reduction of motor 3.
    Motor3HoldCurrentReduction, HoldCurrentReduction, 53, rw
}

device_register! {
    /// Minimum interval between step pulses of motor 0, in µs. Sets the top speed.
    Motor0StepInterval, u16, 54, rw
}
device_register! {
    /// Minimum interval between step pulses of motor 1, in µs. Sets the top speed.
    Motor1StepInterval, u16, 55, rw
}
device_register! {
    /// Minimum interval between step pulses of motor 2, in µs. Sets the top speed.
    Motor2StepInterval, u16, 56, rw
}
device_register! {
    /// Minimum interval between step pulses of motor 3, in µs. Sets the top speed.
    Motor3StepInterval, u16, 57, rw
}

device_register! {
    /// Step interval motor 0 starts a ramp from, in µs.
    Motor0MaximumStepInterval, u16, 58, rw
}
device_register! {
    /// Step interval motor 1 starts a ramp from, in µs.
    Motor1MaximumStepInterval, u16, 59, rw
}
device_register! {
    /// Step interval motor 2 starts a ramp from, in µs.
    Motor2MaximumStepInterval, u16, 60, rw
}
device_register! {
    /// Step interval motor 3 starts a ramp from, in µs.
    Motor3MaximumStepInterval, u16, 61, rw
}

device_register! {
    /// Interval decrement applied each step while motor 0 accelerates, in µs.
    Motor0StepAccelerationInterval, u16, 62, rw
}
device_register! {
    /// Interval decrement applied each step while motor 1 accelerates, in µs.
    Motor1StepAccelerationInterval, u16, 63, rw
}
device_register! {
    /// Interval decrement applied each step while motor 2 accelerates, in µs.
    Motor2StepAccelerationInterval, u16, 64, rw
}
device_register! {
    /// Interval decrement applied each step while motor 3 accelerates, in µs.
    Motor3StepAccelerationInterval, u16, 65, rw
}

// --- Encoders and digital inputs -------------------------------------------

device_register! {
    /// Whether encoders report absolute position or per-sample displacement.
    EncoderModeRegister, EncoderMode, 66, rw
}
device_register! {
    /// Rate of the periodic encoder events.
    EncoderSamplingRateRegister, EncoderSamplingRate, 67, rw
}

device_register! {
    /// Action taken when input 0 triggers.
    Input0OperationMode, InputOperationMode, 68, rw
}
device_register! {
    /// Action taken when input 1 triggers.
    Input1OperationMode, InputOperationMode, 69, rw
}
device_register! {
    /// Action taken when input 2 triggers.
    Input2OperationMode, InputOperationMode, 70, rw
}
device_register! {
    /// Action taken when input 3 triggers.
    Input3OperationMode, InputOperationMode, 71, rw
}

device_register! {
    /// Significant edge of input 0.
    Input0TriggerMode, TriggerMode, 72, rw
}
device_register! {
    /// Significant edge of input 1.
    Input1TriggerMode, TriggerMode, 73, rw
}
device_register! {
    /// Significant edge of input 2.
    Input2TriggerMode, TriggerMode, 74, rw
}
device_register! {
    /// Significant edge of input 3.
    Input3TriggerMode, TriggerMode, 75, rw
}

device_register! {
    /// Contact state that engages the emergency stop.
    EmergencyStopModeRegister, EmergencyStopMode, 76, rw
}

// --- Status registers (event sources) --------------------------------------

device_register! {
    /// Motors that have come to a stop. Emitted as an event on change.
    MotorStopped, MotorFlags, 77, ro
}
device_register! {
    /// Motors whose driver reported over-voltage. Emitted as an event.
    MotorOverVoltageDetection, MotorFlags, 78, ro
}
device_register! {
    /// Motors whose driver raised an error. Emitted as an event.
    MotorErrorDetection, MotorFlags, 79, ro
}

device_register! {
    /// Reading of encoder 0. Emitted at the configured sampling rate.
    Encoder0, i16, 80, ro
}
device_register! {
    /// Reading of encoder 1. Emitted at the configured sampling rate.
    Encoder1, i16, 81, ro
}
device_register! {
    /// Reading of encoder 2. Emitted at the configured sampling rate.
    Encoder2, i16, 82, ro
}

device_register! {
    /// Level of the digital input lines. Emitted as an event on change.
    DigitalInputState, DigitalInputFlags, 83, ro
}
device_register! {
    /// Whether the controller is currently allowed to drive its motors.
    /// Emitted as an event on change.
    DeviceState, DeviceStateMode, 84, ro
}

// --- Movement commands ------------------------------------------------------

device_register! {
    /// Moves motor 0 by the written number of microsteps, signed.
    Motor0MoveRelative, i32, 85, rw
}
device_register! {
    /// Moves motor 1 by the written number of microsteps, signed.
    Motor1MoveRelative, i32, 86, rw
}
device_register! {
    /// Moves motor 2 by the written number of microsteps, signed.
    Motor2MoveRelative, i32, 87, rw
}
device_register! {
    /// Moves motor 3 by the written number of microsteps, signed.
    Motor3MoveRelative, i32, 88, rw
}

device_register! {
    /// Moves motor 0 to the written absolute position, in microsteps.
    Motor0MoveAbsolute, i32, 89, rw
}
device_register! {
    /// Moves motor 1 to the written absolute position, in microsteps.
    Motor1MoveAbsolute, i32, 90, rw
}
device_register! {
    /// Moves motor 2 to the written absolute position, in microsteps.
    Motor2MoveAbsolute, i32, 91, rw
}
device_register! {
    /// Moves motor 3 to the written absolute position, in microsteps.
    Motor3MoveAbsolute, i32, 92, rw
}

// --- Step counters and travel limits ---------------------------------------

device_register! {
    /// Microsteps accumulated by motor 0. Writable, to re-zero the counter.
    Motor0AccumulatedSteps, i32, 93, rw
}
device_register! {
    /// Microsteps accumulated by motor 1. Writable, to re-zero the counter.
    Motor1AccumulatedSteps, i32, 94, rw
}
device_register! {
    /// Microsteps accumulated by motor 2. Writable, to re-zero the counter.
    Motor2AccumulatedSteps, i32, 95, rw
}
device_register! {
    /// Microsteps accumulated by motor 3. Writable, to re-zero the counter.
    Motor3AccumulatedSteps, i32, 96, rw
}

device_register! {
    /// Upper travel limit of motor 0, in microsteps.
    Motor0MaximumPosition, i32, 97, rw
}
device_register! {
    /// Upper travel limit of motor 1, in microsteps.
    Motor1MaximumPosition, i32, 98, rw
}
device_register! {
    /// Upper travel limit of motor 2, in microsteps.
    Motor2MaximumPosition, i32, 99, rw
}
device_register! {
    /// Upper travel limit of motor 3, in microsteps.
    Motor3MaximumPosition, i32, 100, rw
}

device_register! {
    /// Lower travel limit of motor 0, in microsteps.
    Motor0MinimumPosition, i32, 101, rw
}
device_register! {
    /// Lower travel limit of motor 1, in microsteps.
    Motor1MinimumPosition, i32, 102, rw
}
device_register! {
    /// Lower travel limit of motor 2, in microsteps.
    Motor2MinimumPosition, i32, 103, rw
}
device_register! {
    /// Lower travel limit of motor 3, in microsteps.
    Motor3MinimumPosition, i32, 104, rw
}

device_register! {
    /// Immediate step rate of motor 0, in steps per second; the sign sets
    /// the direction and zero stops the motor.
    Motor0ImmediatePulses, i16, 105, rw
}
device_register! {
    /// Immediate step rate of motor 1, in steps per second; the sign sets
    /// the direction and zero stops the motor.
    Motor1ImmediatePulses, i16, 106, rw
}
device_register! {
    /// Immediate step rate of motor 2, in steps per second; the sign sets
    /// the direction and zero stops the motor.
    Motor2ImmediatePulses, i16, 107, rw
}
device_register! {
    /// Immediate step rate of motor 3, in steps per second; the sign sets
    /// the direction and zero stops the motor.
    Motor3ImmediatePulses, i16, 108, rw
}

device_register! {
    /// Rate of the periodic accumulated-steps events.
    AccumulatedStepsSamplingRateRegister, AccumulatedStepsSamplingRate, 109, rw
}
device_register! {
    /// Decelerates and stops the motors selected in the written mask.
    StopMotors, MotorFlags, 110, rw
}
device_register! {
    /// Zeroes the encoder counts selected in the written mask.
    ResetEncoders, EncoderFlags, 111, rw
}

#[cfg(test)]
mod tests {
    use super::*;

    // Spot checks against the device's register map description.
    #[test]
    fn block_boundaries() {
        assert_eq!(EnableMotors::ADDRESS, 32);
        assert_eq!(Motor0OperationMode::ADDRESS, 38);
        assert_eq!(Motor3MaximumRunCurrent::ADDRESS, 49);
        assert_eq!(Motor3StepAccelerationInterval::ADDRESS, 65);
        assert_eq!(EncoderModeRegister::ADDRESS, 66);
        assert_eq!(EmergencyStopModeRegister::ADDRESS, 76);
        assert_eq!(MotorStopped::ADDRESS, 77);
        assert_eq!(DeviceState::ADDRESS, 84);
        assert_eq!(Motor0MoveRelative::ADDRESS, 85);
        assert_eq!(Motor3MoveAbsolute::ADDRESS, 92);
        assert_eq!(Motor3MinimumPosition::ADDRESS, 104);
        assert_eq!(Motor3ImmediatePulses::ADDRESS, 108);
        assert_eq!(ResetEncoders::ADDRESS, 111);
    }
}
