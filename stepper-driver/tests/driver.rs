//! Driver tests against a scripted in-memory serial transport.

use core::convert::Infallible;

use harp_protocol::{HarpMessage, HarpTimestamp, MessageType, PayloadType};
use stepper_driver::registers::*;
use stepper_driver::types::*;
use stepper_driver::{BusError, StepperDriver, StepperEvent, WHO_AM_I};

/// Replays scripted device bytes and records everything the driver sends.
struct MockUart {
    incoming: Vec<u8>,
    cursor: usize,
    outgoing: Vec<u8>,
}

impl MockUart {
    fn new() -> Self {
        Self {
            incoming: Vec::new(),
            cursor: 0,
            outgoing: Vec::new(),
        }
    }

    fn queue(&mut self, message: &HarpMessage) {
        self.incoming.extend_from_slice(&message.to_frame());
    }
}

impl embedded_io::ErrorType for MockUart {
    type Error = Infallible;
}

impl embedded_io_async::Read for MockUart {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = &self.incoming[self.cursor..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor += n;
        Ok(n)
    }
}

impl embedded_io_async::Write for MockUart {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.outgoing.extend_from_slice(buf);
        Ok(buf.len())
    }
}

fn timestamp() -> HarpTimestamp {
    HarpTimestamp::new(42, 10_000)
}

#[futures_test::test]
async fn read_decodes_reply_and_sends_one_request() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::read_reply(Encoder0::ADDRESS, timestamp(), &-512i16));
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(driver.encoder0().await, Ok(-512));

    let uart = driver.release();
    let expected = HarpMessage::read_request(Encoder0::ADDRESS, PayloadType::S16).to_frame();
    assert_eq!(uart.outgoing, expected.to_vec());
}

#[futures_test::test]
async fn read_timestamped_keeps_capture_time() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::read_reply(
        Motor0AccumulatedSteps::ADDRESS,
        timestamp(),
        &123_456i32,
    ));
    let mut driver = StepperDriver::from_uart(uart);

    let reading = driver
        .read_timestamped::<Motor0AccumulatedSteps>()
        .await
        .unwrap();
    assert_eq!(reading.time, timestamp());
    assert_eq!(reading.value, 123_456);
}

#[futures_test::test]
async fn write_sends_value_and_awaits_acknowledgement() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::write_reply(
        Motor0MoveRelative::ADDRESS,
        timestamp(),
        &-6400i32,
    ));
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(driver.set_motor0_move_relative(-6400).await, Ok(()));

    let uart = driver.release();
    let expected = HarpMessage::write_request(Motor0MoveRelative::ADDRESS, &-6400i32).to_frame();
    assert_eq!(uart.outgoing, expected.to_vec());
}

#[futures_test::test]
async fn error_reply_surfaces_as_device_error() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::error_reply(
        MessageType::Write,
        Motor0MaximumRunCurrent::ADDRESS,
        PayloadType::Float,
    ));
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(
        driver.set_motor0_maximum_run_current(9.9).await,
        Err(BusError::Device {
            address: Motor0MaximumRunCurrent::ADDRESS
        })
    );
}

#[futures_test::test]
async fn reply_for_wrong_register_is_rejected() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::read_reply(Encoder1::ADDRESS, timestamp(), &7i16));
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(
        driver.encoder0().await,
        Err(BusError::UnexpectedReply {
            expected: Encoder0::ADDRESS,
            actual: Encoder1::ADDRESS,
        })
    );
}

#[futures_test::test]
async fn event_before_reply_is_queued_not_lost() {
    let mut uart = MockUart::new();
    let mask = MotorFlags::MOTOR0 | MotorFlags::MOTOR2;
    uart.queue(&HarpMessage::event(MotorStopped::ADDRESS, timestamp(), &mask));
    uart.queue(&HarpMessage::read_reply(
        DigitalInputState::ADDRESS,
        timestamp(),
        &DigitalInputFlags::INPUT1,
    ));
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(
        driver.digital_input_state().await,
        Ok(DigitalInputFlags::INPUT1)
    );
    let event = driver.take_event().unwrap();
    assert_eq!(event.value, StepperEvent::MotorStopped(mask));
    assert_eq!(event.time, timestamp());
    assert_eq!(driver.take_event(), None);
}

#[futures_test::test]
async fn poll_event_skips_non_event_frames() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::read_reply(Encoder0::ADDRESS, timestamp(), &1i16));
    uart.queue(&HarpMessage::event(Encoder2::ADDRESS, timestamp(), &-33i16));
    let mut driver = StepperDriver::from_uart(uart);

    let event = driver.poll_event().await.unwrap();
    assert_eq!(event.value, StepperEvent::Encoder2(-33));
}

#[futures_test::test]
async fn verify_identity_rejects_other_products() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::read_reply(
        harp_protocol::registers::WhoAmI::ADDRESS,
        timestamp(),
        &1234u16,
    ));
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(
        driver.verify_identity().await,
        Err(BusError::WrongDevice(1234))
    );
}

#[futures_test::test]
async fn verify_identity_accepts_the_stepper_controller() {
    let mut uart = MockUart::new();
    uart.queue(&HarpMessage::read_reply(
        harp_protocol::registers::WhoAmI::ADDRESS,
        timestamp(),
        &WHO_AM_I,
    ));
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(driver.verify_identity().await, Ok(()));
}

#[futures_test::test]
async fn closed_transport_surfaces_as_read_error() {
    let mut uart = MockUart::new();
    // Half a frame, then silence.
    uart.incoming.extend_from_slice(&[1, 6, 80]);
    let mut driver = StepperDriver::from_uart(uart);

    assert_eq!(
        driver.encoder0().await,
        Err(BusError::Read("transport closed mid-frame"))
    );
}

#[futures_test::test]
async fn corrupt_reply_surfaces_as_protocol_error() {
    let mut uart = MockUart::new();
    let mut frame = HarpMessage::read_reply(Encoder0::ADDRESS, timestamp(), &1i16)
        .to_frame()
        .to_vec();
    let last = frame.len() - 1;
    frame[last] ^= 0xff;
    uart.incoming.extend_from_slice(&frame);
    let mut driver = StepperDriver::from_uart(uart);

    assert!(matches!(
        driver.encoder0().await,
        Err(BusError::Protocol(
            harp_protocol::ProtocolError::ChecksumMismatch { .. }
        ))
    ));
}
