//! Blocking serial client for one Harp device, for host-side tools.

use crate::registers::{Register, WritableRegister};
use crate::{HarpMessage, PayloadValue, ProtocolError};
use log::{error, trace};
use nb::Error::{Other, WouldBlock};
use serialport::SerialPort;
use std::io;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// How long `request` waits for the device to reply before giving up.
pub const REPLY_TIMEOUT: Duration = Duration::from_millis(500);
const POLL_SLEEP: Duration = Duration::from_millis(2);

/// A client to talk to a Harp device over a serial port.
///
/// Commands are written eagerly; incoming bytes are buffered and drained one
/// complete frame at a time, so replies and events interleaved by the device
/// are both surfaced. Malformed frames are logged and skipped rather than
/// wedging the stream.
pub struct HarpClient {
    port: Box<dyn SerialPort>,
    buffer: Vec<u8>,
}

impl HarpClient {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self {
            port,
            buffer: Vec::new(),
        }
    }

    /// Sends a single command frame.
    pub fn send(&mut self, message: &HarpMessage) -> Result<(), io::Error> {
        trace!("Sending {:?}", message);
        self.port.write_all(&message.to_frame())
    }

    /// Reads from the serial port and returns any complete frames.
    pub fn poll(&mut self) -> Result<Vec<HarpMessage>, io::Error> {
        if self.port.bytes_to_read()? > 0 {
            let mut temp = [0; 256];
            let bytes_read = self.port.read(&mut temp)?;
            self.buffer.extend(&temp[..bytes_read]);
        }

        let mut messages = vec![];
        loop {
            match HarpMessage::parse(&self.buffer) {
                Ok((message, length)) => {
                    self.buffer.drain(..length);
                    messages.push(message);
                }
                Err(Other((e, length))) => {
                    error!("Dropping {} bytes: {}", length, e);
                    self.buffer.drain(..length.min(self.buffer.len()));
                }
                Err(WouldBlock) => break,
            }
        }
        Ok(messages)
    }

    /// Sends a command and blocks until the matching reply arrives.
    ///
    /// Event frames that arrive in the meantime are dropped; use `poll` if
    /// you care about them.
    pub fn request(&mut self, request: &HarpMessage) -> Result<HarpMessage, io::Error> {
        self.send(request)?;
        let deadline = Instant::now() + REPLY_TIMEOUT;
        while Instant::now() < deadline {
            for message in self.poll()? {
                if message.message_type == request.message_type
                    && message.address == request.address
                {
                    return Ok(message);
                }
                trace!("Skipping interleaved {:?}", message);
            }
            sleep(POLL_SLEEP);
        }
        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "no reply from device",
        ))
    }

    /// Reads a typed register.
    pub fn read<R: Register>(&mut self) -> Result<R::Value, io::Error> {
        let request = HarpMessage::read_request(R::ADDRESS, <R::Value as PayloadValue>::PAYLOAD_TYPE);
        let reply = self.request(&request)?;
        if reply.error {
            return Err(device_error(R::ADDRESS));
        }
        R::Value::from_payload(reply.payload()).map_err(invalid_data)
    }

    /// Writes a typed register and waits for the device to acknowledge.
    pub fn write<R: WritableRegister>(&mut self, value: R::Value) -> Result<(), io::Error> {
        let reply = self.request(&HarpMessage::write_request(R::ADDRESS, &value))?;
        if reply.error {
            return Err(device_error(R::ADDRESS));
        }
        Ok(())
    }
}

fn device_error(address: u8) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("device rejected command for register {}", address),
    )
}

fn invalid_data(e: ProtocolError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}
