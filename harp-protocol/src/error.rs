#[derive(displaydoc::Display, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProtocolError {
    /// got an invalid message type code: `{0}`
    InvalidMessageType(u8),
    /// got an invalid payload type code: `{0}`
    InvalidPayloadType(u8),
    /// declared frame length is not valid: `{0}`
    InvalidLength(u8),
    /// message too long
    MessageTooLong,
    /// checksum mismatch (expected `{expected}`, got `{actual}`)
    ChecksumMismatch { expected: u8, actual: u8 },
    /// payload size mismatch (expected `{expected}` bytes, got `{actual}`)
    PayloadSizeMismatch { expected: u8, actual: u8 },
    /// register payload holds a value outside its domain: `{0}`
    InvalidPayloadValue(u8),
    /// expected a timestamped payload
    MissingTimestamp,
}

impl core::error::Error for ProtocolError {}
