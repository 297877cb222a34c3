use core::fmt::Display;

use crate::events::StepperEvent;
use crate::registers::*;
use crate::types::*;
use crate::WHO_AM_I;
use arrayvec::ArrayVec;
use embassy_time::{Duration, TimeoutError, WithTimeout};
use harp_protocol::registers as core_regs;
use harp_protocol::registers::OperationControlValue;
use harp_protocol::{
    HarpMessage, MessageType, PayloadValue, ProtocolError, ReadError, Timestamped,
};

static RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Events that arrive while a reply is awaited are parked here until the
/// caller drains them with `take_event`.
const PENDING_EVENT_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The device flagged the command as failed for this register address.
    Device { address: u8 },
    /// A reply arrived, but not the one the pending command asked for.
    UnexpectedReply { expected: u8, actual: u8 },
    /// The board answered WhoAmI with somebody else's product code.
    WrongDevice(u16),
    /// The device pushed an event from an address it has no event source at.
    UnknownEvent(u8),
    /// No reply arrived in time. The write **may** still have been applied.
    Timeout,
    /// The reply did not form a valid frame.
    Protocol(ProtocolError),
    Read(&'static str),
    Write(&'static str),
}

impl From<TimeoutError> for BusError {
    fn from(_value: TimeoutError) -> Self {
        Self::Timeout
    }
}

impl From<ProtocolError> for BusError {
    fn from(value: ProtocolError) -> Self {
        Self::Protocol(value)
    }
}

impl<E> From<ReadError<E>> for BusError {
    fn from(value: ReadError<E>) -> Self {
        match value {
            ReadError::Protocol(e) => Self::Protocol(e),
            ReadError::UnexpectedEof => Self::Read("transport closed mid-frame"),
            ReadError::Io(_) => Self::Read("read failed"),
        }
    }
}

impl Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Device { address } => {
                write!(f, "device rejected command for register {address}")
            }
            Self::UnexpectedReply { expected, actual } => {
                write!(f, "expected reply for register {expected}, got {actual}")
            }
            Self::WrongDevice(id) => write!(f, "connected device identifies as {id}"),
            Self::UnknownEvent(address) => write!(f, "unknown event register {address}"),
            Self::Timeout => write!(f, "timed out waiting for reply"),
            Self::Protocol(e) => write!(f, "protocol error: {e}"),
            Self::Read(msg) | Self::Write(msg) => write!(f, "{msg}"),
        }
    }
}

impl core::error::Error for BusError {}

/// An async client for one Harp stepper controller on a serial link.
///
/// The generic `read`/`write` pair carries any typed register; the named
/// methods below them enumerate the controller's whole register map, one
/// accessor per register, in address order.
pub struct StepperDriver<U: embedded_io_async::Read + embedded_io_async::Write> {
    uart: U,
    pending_events: ArrayVec<Timestamped<StepperEvent>, PENDING_EVENT_CAPACITY>,
}

impl<U: embedded_io_async::Read + embedded_io_async::Write> StepperDriver<U> {
    pub fn from_uart(uart: U) -> Self {
        Self {
            uart,
            pending_events: ArrayVec::new(),
        }
    }

    /// Gives the transport back, dropping any still-queued events.
    pub fn release(self) -> U {
        self.uart
    }

    /// Reads a register, dropping the device timestamp from the reply.
    pub async fn read<R: Register>(&mut self) -> Result<R::Value, BusError> {
        Ok(self.read_timestamped::<R>().await?.value)
    }

    /// Reads a register together with its device capture time.
    pub async fn read_timestamped<R: Register>(
        &mut self,
    ) -> Result<Timestamped<R::Value>, BusError> {
        let request =
            HarpMessage::read_request(R::ADDRESS, <R::Value as PayloadValue>::PAYLOAD_TYPE);
        let reply = self.transact(request).await?;
        let value = R::Value::from_payload(reply.payload())?;
        let time = reply.time.ok_or(ProtocolError::MissingTimestamp)?;
        Ok(Timestamped { time, value })
    }

    /// Writes a register and waits for the device to acknowledge.
    pub async fn write<R: WritableRegister>(&mut self, value: R::Value) -> Result<(), BusError> {
        let request = HarpMessage::write_request(R::ADDRESS, &value);
        self.transact(request).await?;
        Ok(())
    }

    async fn transact(&mut self, request: HarpMessage) -> Result<HarpMessage, BusError> {
        self.uart
            .write_all(&request.to_frame())
            .await
            .map_err(|_| BusError::Write("write failed"))?;
        self.uart
            .flush()
            .await
            .map_err(|_| BusError::Write("flush failed"))?;

        loop {
            let reply = HarpMessage::read_async(&mut self.uart)
                .with_timeout(RESPONSE_TIMEOUT)
                .await??;
            if reply.message_type == MessageType::Event {
                if let Some(event) = StepperEvent::from_message(&reply)? {
                    // Queue full: the newest event loses.
                    let _ = self.pending_events.try_push(event);
                }
                continue;
            }
            if reply.error {
                return Err(BusError::Device {
                    address: reply.address,
                });
            }
            if reply.address != request.address
                || reply.message_type != request.message_type
                || reply.payload_type != request.payload_type
            {
                return Err(BusError::UnexpectedReply {
                    expected: request.address,
                    actual: reply.address,
                });
            }
            return Ok(reply);
        }
    }

    /// Pops the oldest event picked up while a reply was being awaited.
    pub fn take_event(&mut self) -> Option<Timestamped<StepperEvent>> {
        if self.pending_events.is_empty() {
            None
        } else {
            Some(self.pending_events.remove(0))
        }
    }

    /// Waits for the next event from the device.
    ///
    /// Returns queued events first; otherwise blocks on the transport with
    /// no timeout, since events arrive whenever the device has something to
    /// say.
    pub async fn poll_event(&mut self) -> Result<Timestamped<StepperEvent>, BusError> {
        if let Some(event) = self.take_event() {
            return Ok(event);
        }
        loop {
            let message = HarpMessage::read_async(&mut self.uart).await?;
            if let Some(event) = StepperEvent::from_message(&message)? {
                return Ok(event);
            }
        }
    }

    // --- Core Harp registers ------------------------------------------------

    pub async fn who_am_i(&mut self) -> Result<u16, BusError> {
        self.read::<core_regs::WhoAmI>().await
    }

    /// Checks that the connected board really is a stepper controller.
    pub async fn verify_identity(&mut self) -> Result<(), BusError> {
        let id = self.who_am_i().await?;
        if id == WHO_AM_I {
            Ok(())
        } else {
            Err(BusError::WrongDevice(id))
        }
    }

    /// Hardware version as (major, minor).
    pub async fn hardware_version(&mut self) -> Result<(u8, u8), BusError> {
        let major = self.read::<core_regs::HardwareVersionHigh>().await?;
        let minor = self.read::<core_regs::HardwareVersionLow>().await?;
        Ok((major, minor))
    }

    /// Firmware version as (major, minor).
    pub async fn firmware_version(&mut self) -> Result<(u8, u8), BusError> {
        let major = self.read::<core_regs::FirmwareVersionHigh>().await?;
        let minor = self.read::<core_regs::FirmwareVersionLow>().await?;
        Ok((major, minor))
    }

    pub async fn timestamp_seconds(&mut self) -> Result<u32, BusError> {
        self.read::<core_regs::TimestampSeconds>().await
    }

    /// Synchronizes the device clock to the given whole second.
    pub async fn set_timestamp_seconds(&mut self, seconds: u32) -> Result<(), BusError> {
        self.write::<core_regs::TimestampSeconds>(seconds).await
    }

    pub async fn operation_control(&mut self) -> Result<OperationControlValue, BusError> {
        self.read::<core_regs::OperationControl>().await
    }

    pub async fn set_operation_control(
        &mut self,
        value: OperationControlValue,
    ) -> Result<(), BusError> {
        self.write::<core_regs::OperationControl>(value).await
    }

    /// Commands a device reset; the written byte selects what is reset.
    pub async fn reset_device(&mut self, mode: u8) -> Result<(), BusError> {
        self.write::<core_regs::ResetDevice>(mode).await
    }

    // --- Channel enable/disable masks ---------------------------------------

    /// Mask most recently written to the EnableMotors register.
    pub async fn enable_motors(&mut self) -> Result<MotorFlags, BusError> {
        self.read::<EnableMotors>().await
    }

    /// Enables the motors selected in `motors`.
    pub async fn set_enable_motors(&mut self, motors: MotorFlags) -> Result<(), BusError> {
        self.write::<EnableMotors>(motors).await
    }

    pub async fn disable_motors(&mut self) -> Result<MotorFlags, BusError> {
        self.read::<DisableMotors>().await
    }

    /// Disables the motors selected in `motors`.
    pub async fn set_disable_motors(&mut self, motors: MotorFlags) -> Result<(), BusError> {
        self.write::<DisableMotors>(motors).await
    }

    pub async fn enable_encoders(&mut self) -> Result<EncoderFlags, BusError> {
        self.read::<EnableEncoders>().await
    }

    pub async fn set_enable_encoders(&mut self, encoders: EncoderFlags) -> Result<(), BusError> {
        self.write::<EnableEncoders>(encoders).await
    }

    pub async fn disable_encoders(&mut self) -> Result<EncoderFlags, BusError> {
        self.read::<DisableEncoders>().await
    }

    pub async fn set_disable_encoders(&mut self, encoders: EncoderFlags) -> Result<(), BusError> {
        self.write::<DisableEncoders>(encoders).await
    }

    pub async fn enable_input_triggers(&mut self) -> Result<DigitalInputFlags, BusError> {
        self.read::<EnableInputTriggers>().await
    }

    pub async fn set_enable_input_triggers(
        &mut self,
        inputs: DigitalInputFlags,
    ) -> Result<(), BusError> {
        self.write::<EnableInputTriggers>(inputs).await
    }

    pub async fn disable_input_triggers(&mut self) -> Result<DigitalInputFlags, BusError> {
        self.read::<DisableInputTriggers>().await
    }

    pub async fn set_disable_input_triggers(
        &mut self,
        inputs: DigitalInputFlags,
    ) -> Result<(), BusError> {
        self.write::<DisableInputTriggers>(inputs).await
    }

    // --- Per-motor configuration --------------------------------------------

    pub async fn motor0_operation_mode(&mut self) -> Result<MotorOperationMode, BusError> {
        self.read::<Motor0OperationMode>().await
    }

    pub async fn set_motor0_operation_mode(
        &mut self,
        mode: MotorOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Motor0OperationMode>(mode).await
    }

    pub async fn motor1_operation_mode(&mut self) -> Result<MotorOperationMode, BusError> {
        self.read::<Motor1OperationMode>().await
    }

    pub async fn set_motor1_operation_mode(
        &mut self,
        mode: MotorOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Motor1OperationMode>(mode).await
    }

    pub async fn motor2_operation_mode(&mut self) -> Result<MotorOperationMode, BusError> {
        self.read::<Motor2OperationMode>().await
    }

    pub async fn set_motor2_operation_mode(
        &mut self,
        mode: MotorOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Motor2OperationMode>(mode).await
    }

    pub async fn motor3_operation_mode(&mut self) -> Result<MotorOperationMode, BusError> {
        self.read::<Motor3OperationMode>().await
    }

    pub async fn set_motor3_operation_mode(
        &mut self,
        mode: MotorOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Motor3OperationMode>(mode).await
    }

    pub async fn motor0_microstep_resolution(&mut self) -> Result<MicrostepResolution, BusError> {
        self.read::<Motor0MicrostepResolution>().await
    }

    pub async fn set_motor0_microstep_resolution(
        &mut self,
        resolution: MicrostepResolution,
    ) -> Result<(), BusError> {
        self.write::<Motor0MicrostepResolution>(resolution).await
    }

    pub async fn motor1_microstep_resolution(&mut self) -> Result<MicrostepResolution, BusError> {
        self.read::<Motor1MicrostepResolution>().await
    }

    pub async fn set_motor1_microstep_resolution(
        &mut self,
        resolution: MicrostepResolution,
    ) -> Result<(), BusError> {
        self.write::<Motor1MicrostepResolution>(resolution).await
    }

    pub async fn motor2_microstep_resolution(&mut self) -> Result<MicrostepResolution, BusError> {
        self.read::<Motor2MicrostepResolution>().await
    }

    pub async fn set_motor2_microstep_resolution(
        &mut self,
        resolution: MicrostepResolution,
    ) -> Result<(), BusError> {
        self.write::<Motor2MicrostepResolution>(resolution).await
    }

    pub async fn motor3_microstep_resolution(&mut self) -> Result<MicrostepResolution, BusError> {
        self.read::<Motor3MicrostepResolution>().await
    }

    pub async fn set_motor3_microstep_resolution(
        &mut self,
        resolution: MicrostepResolution,
    ) -> Result<(), BusError> {
        self.write::<Motor3MicrostepResolution>(resolution).await
    }

    /// Maximum run RMS current of motor 0, in amps.
    pub async fn motor0_maximum_run_current(&mut self) -> Result<f32, BusError> {
        self.read::<Motor0MaximumRunCurrent>().await
    }

    pub async fn set_motor0_maximum_run_current(&mut self, amps: f32) -> Result<(), BusError> {
        self.write::<Motor0MaximumRunCurrent>(amps).await
    }

    pub async fn motor1_maximum_run_current(&mut self) -> Result<f32, BusError> {
        self.read::<Motor1MaximumRunCurrent>().await
    }

    pub async fn set_motor1_maximum_run_current(&mut self, amps: f32) -> Result<(), BusError> {
        self.write::<Motor1MaximumRunCurrent>(amps).await
    }

    pub async fn motor2_maximum_run_current(&mut self) -> Result<f32, BusError> {
        self.read::<Motor2MaximumRunCurrent>().await
    }

    pub async fn set_motor2_maximum_run_current(&mut self, amps: f32) -> Result<(), BusError> {
        self.write::<Motor2MaximumRunCurrent>(amps).await
    }

    pub async fn motor3_maximum_run_current(&mut self) -> Result<f32, BusError> {
        self.read::<Motor3MaximumRunCurrent>().await
    }

    pub async fn set_motor3_maximum_run_current(&mut self, amps: f32) -> Result<(), BusError> {
        self.write::<Motor3MaximumRunCurrent>(amps).await
    }

    pub async fn motor0_hold_current_reduction(
        &mut self,
    ) -> Result<HoldCurrentReduction, BusError> {
        self.read::<Motor0HoldCurrentReduction>().await
    }

    pub async fn set_motor0_hold_current_reduction(
        &mut self,
        reduction: HoldCurrentReduction,
    ) -> Result<(), BusError> {
        self.write::<Motor0HoldCurrentReduction>(reduction).await
    }

    pub async fn motor1_hold_current_reduction(
        &mut self,
    ) -> Result<HoldCurrentReduction, BusError> {
        self.read::<Motor1HoldCurrentReduction>().await
    }

    pub async fn set_motor1_hold_current_reduction(
        &mut self,
        reduction: HoldCurrentReduction,
    ) -> Result<(), BusError> {
        self.write::<Motor1HoldCurrentReduction>(reduction).await
    }

    pub async fn motor2_hold_current_reduction(
        &mut self,
    ) -> Result<HoldCurrentReduction, BusError> {
        self.read::<Motor2HoldCurrentReduction>().await
    }

    pub async fn set_motor2_hold_current_reduction(
        &mut self,
        reduction: HoldCurrentReduction,
    ) -> Result<(), BusError> {
        self.write::<Motor2HoldCurrentReduction>(reduction).await
    }

    pub async fn motor3_hold_current_reduction(
        &mut self,
    ) -> Result<HoldCurrentReduction, BusError> {
        self.read::<Motor3HoldCurrentReduction>().await
    }

    pub async fn set_motor3_hold_current_reduction(
        &mut self,
        reduction: HoldCurrentReduction,
    ) -> Result<(), BusError> {
        self.write::<Motor3HoldCurrentReduction>(reduction).await
    }

    /// Minimum step pulse interval of motor 0, in µs.
    pub async fn motor0_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor0StepInterval>().await
    }

    pub async fn set_motor0_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor0StepInterval>(micros).await
    }

    pub async fn motor1_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor1StepInterval>().await
    }

    pub async fn set_motor1_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor1StepInterval>(micros).await
    }

    pub async fn motor2_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor2StepInterval>().await
    }

    pub async fn set_motor2_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor2StepInterval>(micros).await
    }

    pub async fn motor3_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor3StepInterval>().await
    }

    pub async fn set_motor3_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor3StepInterval>(micros).await
    }

    pub async fn motor0_maximum_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor0MaximumStepInterval>().await
    }

    pub async fn set_motor0_maximum_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor0MaximumStepInterval>(micros).await
    }

    pub async fn motor1_maximum_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor1MaximumStepInterval>().await
    }

    pub async fn set_motor1_maximum_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor1MaximumStepInterval>(micros).await
    }

    pub async fn motor2_maximum_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor2MaximumStepInterval>().await
    }

    pub async fn set_motor2_maximum_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor2MaximumStepInterval>(micros).await
    }

    pub async fn motor3_maximum_step_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor3MaximumStepInterval>().await
    }

    pub async fn set_motor3_maximum_step_interval(&mut self, micros: u16) -> Result<(), BusError> {
        self.write::<Motor3MaximumStepInterval>(micros).await
    }

    pub async fn motor0_step_acceleration_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor0StepAccelerationInterval>().await
    }

    pub async fn set_motor0_step_acceleration_interval(
        &mut self,
        micros: u16,
    ) -> Result<(), BusError> {
        self.write::<Motor0StepAccelerationInterval>(micros).await
    }

    pub async fn motor1_step_acceleration_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor1StepAccelerationInterval>().await
    }

    pub async fn set_motor1_step_acceleration_interval(
        &mut self,
        micros: u16,
    ) -> Result<(), BusError> {
        self.write::<Motor1StepAccelerationInterval>(micros).await
    }

    pub async fn motor2_step_acceleration_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor2StepAccelerationInterval>().await
    }

    pub async fn set_motor2_step_acceleration_interval(
        &mut self,
        micros: u16,
    ) -> Result<(), BusError> {
        self.write::<Motor2StepAccelerationInterval>(micros).await
    }

    pub async fn motor3_step_acceleration_interval(&mut self) -> Result<u16, BusError> {
        self.read::<Motor3StepAccelerationInterval>().await
    }

    pub async fn set_motor3_step_acceleration_interval(
        &mut self,
        micros: u16,
    ) -> Result<(), BusError> {
        self.write::<Motor3StepAccelerationInterval>(micros).await
    }

    // --- Encoders and digital inputs ----------------------------------------

    pub async fn encoder_mode(&mut self) -> Result<EncoderMode, BusError> {
        self.read::<EncoderModeRegister>().await
    }

    pub async fn set_encoder_mode(&mut self, mode: EncoderMode) -> Result<(), BusError> {
        self.write::<EncoderModeRegister>(mode).await
    }

    pub async fn encoder_sampling_rate(&mut self) -> Result<EncoderSamplingRate, BusError> {
        self.read::<EncoderSamplingRateRegister>().await
    }

    pub async fn set_encoder_sampling_rate(
        &mut self,
        rate: EncoderSamplingRate,
    ) -> Result<(), BusError> {
        self.write::<EncoderSamplingRateRegister>(rate).await
    }

    pub async fn input0_operation_mode(&mut self) -> Result<InputOperationMode, BusError> {
        self.read::<Input0OperationMode>().await
    }

    pub async fn set_input0_operation_mode(
        &mut self,
        mode: InputOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Input0OperationMode>(mode).await
    }

    pub async fn input1_operation_mode(&mut self) -> Result<InputOperationMode, BusError> {
        self.read::<Input1OperationMode>().await
    }

    pub async fn set_input1_operation_mode(
        &mut self,
        mode: InputOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Input1OperationMode>(mode).await
    }

    pub async fn input2_operation_mode(&mut self) -> Result<InputOperationMode, BusError> {
        self.read::<Input2OperationMode>().await
    }

    pub async fn set_input2_operation_mode(
        &mut self,
        mode: InputOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Input2OperationMode>(mode).await
    }

    pub async fn input3_operation_mode(&mut self) -> Result<InputOperationMode, BusError> {
        self.read::<Input3OperationMode>().await
    }

    pub async fn set_input3_operation_mode(
        &mut self,
        mode: InputOperationMode,
    ) -> Result<(), BusError> {
        self.write::<Input3OperationMode>(mode).await
    }

    pub async fn input0_trigger_mode(&mut self) -> Result<TriggerMode, BusError> {
        self.read::<Input0TriggerMode>().await
    }

    pub async fn set_input0_trigger_mode(&mut self, mode: TriggerMode) -> Result<(), BusError> {
        self.write::<Input0TriggerMode>(mode).await
    }

    pub async fn input1_trigger_mode(&mut self) -> Result<TriggerMode, BusError> {
        self.read::<Input1TriggerMode>().await
    }

    pub async fn set_input1_trigger_mode(&mut self, mode: TriggerMode) -> Result<(), BusError> {
        self.write::<Input1TriggerMode>(mode).await
    }

    pub async fn input2_trigger_mode(&mut self) -> Result<TriggerMode, BusError> {
        self.read::<Input2TriggerMode>().await
    }

    pub async fn set_input2_trigger_mode(&mut self, mode: TriggerMode) -> Result<(), BusError> {
        self.write::<Input2TriggerMode>(mode).await
    }

    pub async fn input3_trigger_mode(&mut self) -> Result<TriggerMode, BusError> {
        self.read::<Input3TriggerMode>().await
    }

    pub async fn set_input3_trigger_mode(&mut self, mode: TriggerMode) -> Result<(), BusError> {
        self.write::<Input3TriggerMode>(mode).await
    }

    pub async fn emergency_stop_mode(&mut self) -> Result<EmergencyStopMode, BusError> {
        self.read::<EmergencyStopModeRegister>().await
    }

    pub async fn set_emergency_stop_mode(
        &mut self,
        mode: EmergencyStopMode,
    ) -> Result<(), BusError> {
        self.write::<EmergencyStopModeRegister>(mode).await
    }

    // --- Status registers ---------------------------------------------------

    /// Motors currently stopped.
    pub async fn motor_stopped(&mut self) -> Result<MotorFlags, BusError> {
        self.read::<MotorStopped>().await
    }

    /// Motors whose driver reported over-voltage.
    pub async fn motor_over_voltage_detection(&mut self) -> Result<MotorFlags, BusError> {
        self.read::<MotorOverVoltageDetection>().await
    }

    /// Motors whose driver raised an error.
    pub async fn motor_error_detection(&mut self) -> Result<MotorFlags, BusError> {
        self.read::<MotorErrorDetection>().await
    }

    pub async fn encoder0(&mut self) -> Result<i16, BusError> {
        self.read::<Encoder0>().await
    }

    pub async fn encoder1(&mut self) -> Result<i16, BusError> {
        self.read::<Encoder1>().await
    }

    pub async fn encoder2(&mut self) -> Result<i16, BusError> {
        self.read::<Encoder2>().await
    }

    pub async fn digital_input_state(&mut self) -> Result<DigitalInputFlags, BusError> {
        self.read::<DigitalInputState>().await
    }

    pub async fn device_state(&mut self) -> Result<DeviceStateMode, BusError> {
        self.read::<DeviceState>().await
    }

    // --- Movement commands --------------------------------------------------

    pub async fn motor0_move_relative(&mut self) -> Result<i32, BusError> {
        self.read::<Motor0MoveRelative>().await
    }

    /// Moves motor 0 by `microsteps`, signed.
    pub async fn set_motor0_move_relative(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor0MoveRelative>(microsteps).await
    }

    pub async fn motor1_move_relative(&mut self) -> Result<i32, BusError> {
        self.read::<Motor1MoveRelative>().await
    }

    pub async fn set_motor1_move_relative(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor1MoveRelative>(microsteps).await
    }

    pub async fn motor2_move_relative(&mut self) -> Result<i32, BusError> {
        self.read::<Motor2MoveRelative>().await
    }

    pub async fn set_motor2_move_relative(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor2MoveRelative>(microsteps).await
    }

    pub async fn motor3_move_relative(&mut self) -> Result<i32, BusError> {
        self.read::<Motor3MoveRelative>().await
    }

    pub async fn set_motor3_move_relative(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor3MoveRelative>(microsteps).await
    }

    pub async fn motor0_move_absolute(&mut self) -> Result<i32, BusError> {
        self.read::<Motor0MoveAbsolute>().await
    }

    /// Moves motor 0 to the absolute position `microsteps`.
    pub async fn set_motor0_move_absolute(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor0MoveAbsolute>(microsteps).await
    }

    pub async fn motor1_move_absolute(&mut self) -> Result<i32, BusError> {
        self.read::<Motor1MoveAbsolute>().await
    }

    pub async fn set_motor1_move_absolute(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor1MoveAbsolute>(microsteps).await
    }

    pub async fn motor2_move_absolute(&mut self) -> Result<i32, BusError> {
        self.read::<Motor2MoveAbsolute>().await
    }

    pub async fn set_motor2_move_absolute(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor2MoveAbsolute>(microsteps).await
    }

    pub async fn motor3_move_absolute(&mut self) -> Result<i32, BusError> {
        self.read::<Motor3MoveAbsolute>().await
    }

    pub async fn set_motor3_move_absolute(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor3MoveAbsolute>(microsteps).await
    }

    // --- Step counters and travel limits ------------------------------------

    pub async fn motor0_accumulated_steps(&mut self) -> Result<i32, BusError> {
        self.read::<Motor0AccumulatedSteps>().await
    }

    /// Overwrites the step counter of motor 0, typically with zero.
    pub async fn set_motor0_accumulated_steps(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor0AccumulatedSteps>(microsteps).await
    }

    pub async fn motor1_accumulated_steps(&mut self) -> Result<i32, BusError> {
        self.read::<Motor1AccumulatedSteps>().await
    }

    pub async fn set_motor1_accumulated_steps(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor1AccumulatedSteps>(microsteps).await
    }

    pub async fn motor2_accumulated_steps(&mut self) -> Result<i32, BusError> {
        self.read::<Motor2AccumulatedSteps>().await
    }

    pub async fn set_motor2_accumulated_steps(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor2AccumulatedSteps>(microsteps).await
    }

    pub async fn motor3_accumulated_steps(&mut self) -> Result<i32, BusError> {
        self.read::<Motor3AccumulatedSteps>().await
    }

    pub async fn set_motor3_accumulated_steps(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor3AccumulatedSteps>(microsteps).await
    }

    pub async fn motor0_maximum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor0MaximumPosition>().await
    }

    pub async fn set_motor0_maximum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor0MaximumPosition>(microsteps).await
    }

    pub async fn motor1_maximum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor1MaximumPosition>().await
    }

    pub async fn set_motor1_maximum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor1MaximumPosition>(microsteps).await
    }

    pub async fn motor2_maximum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor2MaximumPosition>().await
    }

    pub async fn set_motor2_maximum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor2MaximumPosition>(microsteps).await
    }

    pub async fn motor3_maximum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor3MaximumPosition>().await
    }

    pub async fn set_motor3_maximum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor3MaximumPosition>(microsteps).await
    }

    pub async fn motor0_minimum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor0MinimumPosition>().await
    }

    pub async fn set_motor0_minimum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor0MinimumPosition>(microsteps).await
    }

    pub async fn motor1_minimum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor1MinimumPosition>().await
    }

    pub async fn set_motor1_minimum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor1MinimumPosition>(microsteps).await
    }

    pub async fn motor2_minimum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor2MinimumPosition>().await
    }

    pub async fn set_motor2_minimum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor2MinimumPosition>(microsteps).await
    }

    pub async fn motor3_minimum_position(&mut self) -> Result<i32, BusError> {
        self.read::<Motor3MinimumPosition>().await
    }

    pub async fn set_motor3_minimum_position(&mut self, microsteps: i32) -> Result<(), BusError> {
        self.write::<Motor3MinimumPosition>(microsteps).await
    }

    pub async fn motor0_immediate_pulses(&mut self) -> Result<i16, BusError> {
        self.read::<Motor0ImmediatePulses>().await
    }

    /// Runs motor 0 at `steps_per_second` until told otherwise; zero stops it.
    pub async fn set_motor0_immediate_pulses(
        &mut self,
        steps_per_second: i16,
    ) -> Result<(), BusError> {
        self.write::<Motor0ImmediatePulses>(steps_per_second).await
    }

    pub async fn motor1_immediate_pulses(&mut self) -> Result<i16, BusError> {
        self.read::<Motor1ImmediatePulses>().await
    }

    pub async fn set_motor1_immediate_pulses(
        &mut self,
        steps_per_second: i16,
    ) -> Result<(), BusError> {
        self.write::<Motor1ImmediatePulses>(steps_per_second).await
    }

    pub async fn motor2_immediate_pulses(&mut self) -> Result<i16, BusError> {
        self.read::<Motor2ImmediatePulses>().await
    }

    pub async fn set_motor2_immediate_pulses(
        &mut self,
        steps_per_second: i16,
    ) -> Result<(), BusError> {
        self.write::<Motor2ImmediatePulses>(steps_per_second).await
    }

    pub async fn motor3_immediate_pulses(&mut self) -> Result<i16, BusError> {
        self.read::<Motor3ImmediatePulses>().await
    }

    pub async fn set_motor3_immediate_pulses(
        &mut self,
        steps_per_second: i16,
    ) -> Result<(), BusError> {
        self.write::<Motor3ImmediatePulses>(steps_per_second).await
    }

    // --- Miscellaneous ------------------------------------------------------

    pub async fn accumulated_steps_sampling_rate(
        &mut self,
    ) -> Result<AccumulatedStepsSamplingRate, BusError> {
        self.read::<AccumulatedStepsSamplingRateRegister>().await
    }

    pub async fn set_accumulated_steps_sampling_rate(
        &mut self,
        rate: AccumulatedStepsSamplingRate,
    ) -> Result<(), BusError> {
        self.write::<AccumulatedStepsSamplingRateRegister>(rate)
            .await
    }

    pub async fn stop_motors(&mut self) -> Result<MotorFlags, BusError> {
        self.read::<StopMotors>().await
    }

    /// Decelerates and stops the motors selected in `motors`.
    pub async fn set_stop_motors(&mut self, motors: MotorFlags) -> Result<(), BusError> {
        self.write::<StopMotors>(motors).await
    }

    pub async fn reset_encoders(&mut self) -> Result<EncoderFlags, BusError> {
        self.read::<ResetEncoders>().await
    }

    /// Zeroes the encoder counts selected in `encoders`.
    pub async fn set_reset_encoders(&mut self, encoders: EncoderFlags) -> Result<(), BusError> {
        self.write::<ResetEncoders>(encoders).await
    }
}
