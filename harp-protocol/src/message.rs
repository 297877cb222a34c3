use crate::payload::{PayloadBuf, TIMESTAMP_FLAG};
use crate::{HarpTimestamp, PayloadType, PayloadValue, ProtocolError};
use arrayvec::ArrayVec;
use core::convert::TryInto;
use embedded_io_async::ReadExactError;
use nb::Error::{Other, WouldBlock};

use crate::payload::MAX_PAYLOAD;

/// Largest complete frame: header (5 bytes), timestamp (6 bytes), payload
/// and checksum.
pub const MAX_FRAME: usize = MAX_PAYLOAD + 12;

/// Port byte addressing the device itself rather than a peripheral port.
pub const DEVICE_PORT: u8 = 255;

const ERROR_FLAG: u8 = 0x08;
const TIME_BYTES: usize = 6;
/// Address + port + payload type + checksum: the smallest valid Length.
const MIN_LENGTH: u8 = 4;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MessageType {
    Read = 1,
    Write = 2,
    Event = 3,
}

impl MessageType {
    /// Decodes a MessageType byte, splitting off the error flag.
    pub fn from_code(code: u8) -> Result<(Self, bool), ProtocolError> {
        let error = code & ERROR_FLAG != 0;
        let message_type = match code & !ERROR_FLAG {
            1 => Self::Read,
            2 => Self::Write,
            3 => Self::Event,
            _ => return Err(ProtocolError::InvalidMessageType(code)),
        };
        Ok((message_type, error))
    }

    pub fn code(self, error: bool) -> u8 {
        self as u8 | if error { ERROR_FLAG } else { 0 }
    }
}

/// Failure reading a frame from an async byte stream.
#[derive(Debug)]
pub enum ReadError<E> {
    /// The underlying transport failed.
    Io(E),
    /// The stream ended in the middle of a frame.
    UnexpectedEof,
    /// The bytes did not form a valid frame.
    Protocol(ProtocolError),
}

impl<E> From<ReadExactError<E>> for ReadError<E> {
    fn from(value: ReadExactError<E>) -> Self {
        match value {
            ReadExactError::UnexpectedEof => Self::UnexpectedEof,
            ReadExactError::Other(e) => Self::Io(e),
        }
    }
}

/// One Harp frame, decoded.
///
/// Wire layout (little-endian):
///
/// ```text
/// MessageType Length Address Port PayloadType [Seconds(4) Micros32(2)] Payload.. Checksum
/// ```
///
/// `Length` counts every byte after itself; the checksum is the wrapping u8
/// sum of all preceding frame bytes. Bit 3 of MessageType flags an error
/// reply and bit 4 of PayloadType flags a timestamped payload; both travel
/// as separate fields here.
#[derive(Clone, Debug, PartialEq)]
pub struct HarpMessage {
    pub message_type: MessageType,
    pub error: bool,
    pub address: u8,
    pub port: u8,
    pub payload_type: PayloadType,
    pub time: Option<HarpTimestamp>,
    payload: PayloadBuf,
}

impl HarpMessage {
    /// A host-to-device read command for the given register.
    pub fn read_request(address: u8, payload_type: PayloadType) -> Self {
        Self {
            message_type: MessageType::Read,
            error: false,
            address,
            port: DEVICE_PORT,
            payload_type,
            time: None,
            payload: PayloadBuf::new(),
        }
    }

    /// A host-to-device write command carrying the given value.
    pub fn write_request<V: PayloadValue>(address: u8, value: &V) -> Self {
        let mut payload = PayloadBuf::new();
        value.write_payload(&mut payload);
        Self {
            message_type: MessageType::Write,
            error: false,
            address,
            port: DEVICE_PORT,
            payload_type: V::PAYLOAD_TYPE,
            time: None,
            payload,
        }
    }

    /// A device-to-host reply to a read command.
    pub fn read_reply<V: PayloadValue>(address: u8, time: HarpTimestamp, value: &V) -> Self {
        Self::reply(MessageType::Read, address, time, value)
    }

    /// A device-to-host reply to a write command, echoing the written value.
    pub fn write_reply<V: PayloadValue>(address: u8, time: HarpTimestamp, value: &V) -> Self {
        Self::reply(MessageType::Write, address, time, value)
    }

    /// A device-to-host event frame.
    pub fn event<V: PayloadValue>(address: u8, time: HarpTimestamp, value: &V) -> Self {
        Self::reply(MessageType::Event, address, time, value)
    }

    fn reply<V: PayloadValue>(
        message_type: MessageType,
        address: u8,
        time: HarpTimestamp,
        value: &V,
    ) -> Self {
        let mut payload = PayloadBuf::new();
        value.write_payload(&mut payload);
        Self {
            message_type,
            error: false,
            address,
            port: DEVICE_PORT,
            payload_type: V::PAYLOAD_TYPE,
            time: Some(time),
            payload,
        }
    }

    /// A device-to-host error reply to a failed command.
    pub fn error_reply(message_type: MessageType, address: u8, payload_type: PayloadType) -> Self {
        Self {
            message_type,
            error: true,
            address,
            port: DEVICE_PORT,
            payload_type,
            time: None,
            payload: PayloadBuf::new(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn length(&self) -> u8 {
        let time_bytes = if self.time.is_some() { TIME_BYTES } else { 0 };
        (3 + time_bytes + self.payload.len() + 1) as u8
    }

    /// Serializes the message into a complete frame, checksum included.
    pub fn to_frame(&self) -> ArrayVec<u8, MAX_FRAME> {
        let mut frame = ArrayVec::new();
        frame.push(self.message_type.code(self.error));
        frame.push(self.length());
        frame.push(self.address);
        frame.push(self.port);
        let timestamp_flag = if self.time.is_some() {
            TIMESTAMP_FLAG
        } else {
            0
        };
        frame.push(self.payload_type.code() | timestamp_flag);
        if let Some(time) = self.time {
            frame.extend(time.seconds.to_le_bytes());
            frame.extend(time.offset_ticks.to_le_bytes());
        }
        frame.extend(self.payload.iter().copied());
        frame.push(checksum(&frame));
        frame
    }

    /// Parses one frame from the front of `buffer`.
    ///
    /// Returns `WouldBlock` while the frame is still incomplete. On success
    /// and on error alike the second element is the number of bytes the
    /// frame occupied, so a stream client can drain them and resynchronize.
    pub fn parse(buffer: &[u8]) -> nb::Result<(Self, usize), (ProtocolError, usize)> {
        let (&type_code, &length) = match buffer {
            [] | [_] => return Err(WouldBlock),
            [type_code, length, ..] => (type_code, length),
        };
        if length < MIN_LENGTH {
            return Err(Other((ProtocolError::InvalidLength(length), 2)));
        }
        let total = length as usize + 2;
        if total > MAX_FRAME {
            return Err(Other((ProtocolError::MessageTooLong, total)));
        }
        if buffer.len() < total {
            return Err(WouldBlock);
        }
        let frame = &buffer[..total];

        let expected = checksum(&frame[..total - 1]);
        let actual = frame[total - 1];
        if expected != actual {
            return Err(Other((
                ProtocolError::ChecksumMismatch { expected, actual },
                total,
            )));
        }
        let (message_type, error) =
            MessageType::from_code(type_code).map_err(|e| Other((e, total)))?;
        let (payload_type, timestamped) =
            PayloadType::from_code(frame[4]).map_err(|e| Other((e, total)))?;

        let payload_start = if timestamped { 5 + TIME_BYTES } else { 5 };
        if total < payload_start + 1 {
            return Err(Other((ProtocolError::InvalidLength(length), total)));
        }
        let time = timestamped.then(|| HarpTimestamp {
            seconds: u32::from_le_bytes(frame[5..9].try_into().unwrap()),
            offset_ticks: u16::from_le_bytes(frame[9..11].try_into().unwrap()),
        });

        let payload_bytes = &frame[payload_start..total - 1];
        if payload_bytes.len() > MAX_PAYLOAD {
            return Err(Other((ProtocolError::MessageTooLong, total)));
        }
        if payload_bytes.len() % payload_type.size() != 0 {
            return Err(Other((
                ProtocolError::PayloadSizeMismatch {
                    expected: payload_type.size() as u8,
                    actual: payload_bytes.len() as u8,
                },
                total,
            )));
        }
        let mut payload = PayloadBuf::new();
        payload.extend(payload_bytes.iter().copied());

        Ok((
            Self {
                message_type,
                error,
                address: frame[2],
                port: frame[3],
                payload_type,
                time,
                payload,
            },
            total,
        ))
    }

    /// Parses a buffer that must hold exactly one frame.
    pub fn parse_exact(buffer: &[u8]) -> Result<Self, ProtocolError> {
        match Self::parse(buffer) {
            Ok((message, length)) if length == buffer.len() => Ok(message),
            Ok((_, _)) => Err(ProtocolError::MessageTooLong),
            Err(Other((e, _))) => Err(e),
            Err(WouldBlock) => Err(ProtocolError::InvalidLength(
                buffer.get(1).copied().unwrap_or(0),
            )),
        }
    }

    /// Reads one complete frame from an async byte stream.
    pub async fn read_async<R: embedded_io_async::Read>(
        reader: &mut R,
    ) -> Result<Self, ReadError<R::Error>> {
        let mut header = [0; 2];
        reader.read_exact(&mut header).await?;
        let length = header[1];
        if length < MIN_LENGTH {
            return Err(ReadError::Protocol(ProtocolError::InvalidLength(length)));
        }
        let total = length as usize + 2;
        if total > MAX_FRAME {
            return Err(ReadError::Protocol(ProtocolError::MessageTooLong));
        }
        let mut frame = [0; MAX_FRAME];
        frame[..2].copy_from_slice(&header);
        reader.read_exact(&mut frame[2..total]).await?;
        Self::parse_exact(&frame[..total]).map_err(ReadError::Protocol)
    }
}

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |sum, &b| sum.wrapping_add(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn timestamp() -> HarpTimestamp {
        HarpTimestamp::new(3600, 1_250)
    }

    #[test]
    fn read_request_frame() {
        let frame = HarpMessage::read_request(32, PayloadType::U8).to_frame();
        assert_eq!(&frame[..], &[1, 4, 32, 255, 1, 37]);
    }

    #[test]
    fn write_request_frame() {
        let frame = HarpMessage::write_request(54, &1250u16).to_frame();
        assert_eq!(&frame[..], &[2, 6, 54, 255, 2, 0xe2, 0x04, 37]);
    }

    #[test]
    fn error_reply_frame_sets_error_bit() {
        let frame = HarpMessage::error_reply(MessageType::Write, 42, PayloadType::U16).to_frame();
        assert_eq!(frame[0], 2 | 0x08);
        let message = HarpMessage::parse_exact(&frame).unwrap();
        assert!(message.error);
        assert_eq!(message.message_type, MessageType::Write);
    }

    #[test_case(HarpMessage::read_request(32, PayloadType::U8))]
    #[test_case(HarpMessage::write_request(46, &0.5f32))]
    #[test_case(HarpMessage::write_request(85, &-6400i32))]
    #[test_case(HarpMessage::read_reply(80, HarpTimestamp::new(3600, 1_250), &-512i16))]
    #[test_case(HarpMessage::write_reply(54, HarpTimestamp::new(0, 0), &1250u16))]
    #[test_case(HarpMessage::event(83, HarpTimestamp::new(123, 456), &0b1010u8))]
    fn round_trip(message: HarpMessage) {
        let frame = message.to_frame();
        assert_eq!(
            HarpMessage::parse(&frame),
            Ok((message.clone(), frame.len()))
        );
        assert_eq!(HarpMessage::parse_exact(&frame), Ok(message));
    }

    #[test_case(HarpMessage::read_request(32, PayloadType::U8))]
    #[test_case(HarpMessage::event(83, HarpTimestamp::new(123, 456), &0b1010u8))]
    fn would_block_on_every_prefix(message: HarpMessage) {
        let frame = message.to_frame();
        for length in 0..frame.len() {
            assert_eq!(HarpMessage::parse(&frame[..length]), Err(WouldBlock));
        }
    }

    #[test]
    fn parse_consumes_one_frame_of_many() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&HarpMessage::read_request(32, PayloadType::U8).to_frame());
        buffer.extend_from_slice(&HarpMessage::write_request(54, &1250u16).to_frame());

        let (first, length) = HarpMessage::parse(&buffer).unwrap();
        assert_eq!(first.address, 32);
        let (second, _) = HarpMessage::parse(&buffer[length..]).unwrap();
        assert_eq!(second.address, 54);
    }

    #[test]
    fn bad_checksum_reports_frame_length() {
        let mut frame = HarpMessage::read_request(32, PayloadType::U8).to_frame();
        let last = frame.len() - 1;
        frame[last] ^= 0xff;
        assert_eq!(
            HarpMessage::parse(&frame),
            Err(Other((
                ProtocolError::ChecksumMismatch {
                    expected: 37,
                    actual: 37 ^ 0xff
                },
                frame.len()
            )))
        );
    }

    #[test]
    fn undersized_length_byte_is_rejected() {
        assert_eq!(
            HarpMessage::parse(&[1, 2, 0, 0]),
            Err(Other((ProtocolError::InvalidLength(2), 2)))
        );
    }

    #[test]
    fn parse_exact_rejects_trailing_bytes() {
        let mut frame = HarpMessage::read_request(32, PayloadType::U8)
            .to_frame()
            .to_vec();
        frame.push(42);
        assert_eq!(
            HarpMessage::parse_exact(&frame),
            Err(ProtocolError::MessageTooLong)
        );
    }

    #[test]
    fn payload_must_be_whole_elements() {
        // Write frame claiming a U16 payload but carrying three bytes.
        let mut frame = vec![2, 7, 54, 255, 2, 1, 2, 3];
        frame.push(super::checksum(&frame));
        assert_eq!(
            HarpMessage::parse(&frame),
            Err(Other((
                ProtocolError::PayloadSizeMismatch {
                    expected: 2,
                    actual: 3
                },
                frame.len()
            )))
        );
    }

    #[test]
    fn timestamped_reply_carries_time() {
        let reply = HarpMessage::read_reply(80, timestamp(), &-512i16);
        let frame = reply.to_frame();
        // Timestamp flag on the payload type byte, six time bytes after it.
        assert_eq!(frame[4], PayloadType::S16.code() | 0x10);
        let parsed = HarpMessage::parse_exact(&frame).unwrap();
        assert_eq!(parsed.time, Some(timestamp()));
        assert_eq!(i16::from_payload(parsed.payload()), Ok(-512));
    }
}
