use crate::ProtocolError;
use arrayvec::ArrayVec;
use core::convert::TryInto;

/// Largest payload this implementation will carry in a single frame.
pub const MAX_PAYLOAD: usize = 64;

/// Fixed-capacity buffer holding the raw payload bytes of one frame.
pub type PayloadBuf = ArrayVec<u8, MAX_PAYLOAD>;

const SIGNED_FLAG: u8 = 0x80;
const FLOAT_FLAG: u8 = 0x40;
pub(crate) const TIMESTAMP_FLAG: u8 = 0x10;

/// The element type of a register payload, as carried in the PayloadType
/// byte of every frame. The timestamp flag (bit 4) is handled separately by
/// [`PayloadType::from_code`] and the frame serializer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PayloadType {
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    U64,
    S64,
    Float,
}

impl PayloadType {
    pub fn code(self) -> u8 {
        match self {
            Self::U8 => 1,
            Self::S8 => 1 | SIGNED_FLAG,
            Self::U16 => 2,
            Self::S16 => 2 | SIGNED_FLAG,
            Self::U32 => 4,
            Self::S32 => 4 | SIGNED_FLAG,
            Self::U64 => 8,
            Self::S64 => 8 | SIGNED_FLAG,
            Self::Float => 4 | FLOAT_FLAG,
        }
    }

    /// Size in bytes of one element of this type.
    pub fn size(self) -> usize {
        match self {
            Self::U8 | Self::S8 => 1,
            Self::U16 | Self::S16 => 2,
            Self::U32 | Self::S32 | Self::Float => 4,
            Self::U64 | Self::S64 => 8,
        }
    }

    /// Decodes a PayloadType byte, splitting off the timestamp flag.
    pub fn from_code(code: u8) -> Result<(Self, bool), ProtocolError> {
        let timestamped = code & TIMESTAMP_FLAG != 0;
        let payload_type = match code & !TIMESTAMP_FLAG {
            c if c == Self::U8.code() => Self::U8,
            c if c == Self::S8.code() => Self::S8,
            c if c == Self::U16.code() => Self::U16,
            c if c == Self::S16.code() => Self::S16,
            c if c == Self::U32.code() => Self::U32,
            c if c == Self::S32.code() => Self::S32,
            c if c == Self::U64.code() => Self::U64,
            c if c == Self::S64.code() => Self::S64,
            c if c == Self::Float.code() => Self::Float,
            _ => return Err(ProtocolError::InvalidPayloadType(code)),
        };
        Ok((payload_type, timestamped))
    }
}

/// A device-reported capture time: whole seconds since the device clock
/// epoch, plus an offset counted in 32 µs ticks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct HarpTimestamp {
    pub seconds: u32,
    pub offset_ticks: u16,
}

impl HarpTimestamp {
    /// Duration of one offset tick, in microseconds.
    pub const TICK_MICROS: u32 = 32;

    pub fn new(seconds: u32, offset_ticks: u16) -> Self {
        Self {
            seconds,
            offset_ticks,
        }
    }

    /// The sub-second part of the timestamp, in microseconds.
    pub fn micros(self) -> u32 {
        u32::from(self.offset_ticks) * Self::TICK_MICROS
    }

    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.seconds) + f64::from(self.micros()) / 1_000_000.0
    }
}

/// A decoded payload value paired with its device capture time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timestamped<T> {
    pub time: HarpTimestamp,
    pub value: T,
}

/// A value that can travel as the payload of a single-element register.
pub trait PayloadValue: Sized {
    const PAYLOAD_TYPE: PayloadType;

    fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError>;

    fn write_payload(&self, out: &mut PayloadBuf);
}

macro_rules! primitive_payload {
    ($ty:ty, $variant:ident) => {
        impl PayloadValue for $ty {
            const PAYLOAD_TYPE: PayloadType = PayloadType::$variant;

            fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
                let bytes = payload
                    .try_into()
                    .map_err(|_| ProtocolError::PayloadSizeMismatch {
                        expected: PayloadType::$variant.size() as u8,
                        actual: payload.len() as u8,
                    })?;
                Ok(<$ty>::from_le_bytes(bytes))
            }

            fn write_payload(&self, out: &mut PayloadBuf) {
                out.extend(self.to_le_bytes());
            }
        }
    };
}

primitive_payload!(u8, U8);
primitive_payload!(i8, S8);
primitive_payload!(u16, U16);
primitive_payload!(i16, S16);
primitive_payload!(u32, U32);
primitive_payload!(i32, S32);
primitive_payload!(u64, U64);
primitive_payload!(i64, S64);
primitive_payload!(f32, Float);

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(PayloadType::U8, 0x01)]
    #[test_case(PayloadType::S8, 0x81)]
    #[test_case(PayloadType::U16, 0x02)]
    #[test_case(PayloadType::S16, 0x82)]
    #[test_case(PayloadType::U32, 0x04)]
    #[test_case(PayloadType::S32, 0x84)]
    #[test_case(PayloadType::U64, 0x08)]
    #[test_case(PayloadType::S64, 0x88)]
    #[test_case(PayloadType::Float, 0x44)]
    fn wire_codes(payload_type: PayloadType, code: u8) {
        assert_eq!(payload_type.code(), code);
        assert_eq!(PayloadType::from_code(code), Ok((payload_type, false)));
        assert_eq!(
            PayloadType::from_code(code | TIMESTAMP_FLAG),
            Ok((payload_type, true))
        );
    }

    #[test_case(0x00)]
    #[test_case(0x03)]
    #[test_case(0x48 ; "float flag with wrong size")]
    #[test_case(0xff)]
    fn invalid_wire_codes(code: u8) {
        assert_eq!(
            PayloadType::from_code(code),
            Err(ProtocolError::InvalidPayloadType(code))
        );
    }

    #[test]
    fn timestamp_ordering_and_views() {
        let early = HarpTimestamp::new(41, 31_250);
        let late = HarpTimestamp::new(42, 0);
        assert!(early < late);
        assert_eq!(early.micros(), 1_000_000);
        assert_eq!(late.as_secs_f64(), 42.0);
    }

    #[test]
    fn primitive_round_trip() {
        let mut out = PayloadBuf::new();
        (-1_000_000i32).write_payload(&mut out);
        assert_eq!(i32::from_payload(&out), Ok(-1_000_000));
        assert_eq!(
            i32::from_payload(&out[..3]),
            Err(ProtocolError::PayloadSizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn float_is_little_endian() {
        let mut out = PayloadBuf::new();
        1.5f32.write_payload(&mut out);
        assert_eq!(&out[..], &[0x00, 0x00, 0xc0, 0x3f]);
    }
}
