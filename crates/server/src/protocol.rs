//! Wire protocol: `\n`-terminated request lines in, `\r\n`-terminated
//! response lines out.

use bytes::{BufMut, BytesMut};
use kdtreed::{Point, Record};
use std::fmt;
use std::io;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::config::DEFAULT_MAX_LINE_LENGTH;

pub const GREETING: &str = "Connected to kdtreed...";
pub const FAREWELL: &str = "BYE!!!";
pub const INVALID_COMMAND: &str = "INVALID COMMAND";
pub const READ_ERROR: &str = "READ ERROR";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("request line exceeds {0} bytes")]
    LineTooLong(usize),

    #[error("request line is not valid UTF-8")]
    InvalidUtf8,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// Whether the peer sent bytes we could not frame, as opposed to the
    /// transport itself failing.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::LineTooLong(_) | Self::InvalidUtf8)
    }
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Greeting,
    Added(Point),
    Deleted(Point),
    Neighbors(Vec<Record>),
    Invalid,
    ReadError,
    Bye,
}

impl Response {
    /// The session closes after sending a terminal response.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Response::Bye)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Greeting => f.write_str(GREETING),
            Response::Added(point) => write!(f, "{} added", point),
            Response::Deleted(point) => write!(f, "{} deleted", point),
            Response::Neighbors(records) => {
                f.write_str("[")?;
                for (i, record) in records.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", record)?;
                }
                f.write_str("]")
            }
            Response::Invalid => f.write_str(INVALID_COMMAND),
            Response::ReadError => f.write_str(READ_ERROR),
            Response::Bye => f.write_str(FAREWELL),
        }
    }
}

/// Line codec for sessions.
///
/// Decoding strips the `\n` (and a preceding `\r`) and refuses lines longer
/// than the configured limit. Encoding appends `\r\n`.
#[derive(Debug, Clone)]
pub struct ProtocolCodec {
    lines: LinesCodec,
    max_line_length: usize,
}

impl ProtocolCodec {
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_line_length),
            max_line_length,
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn convert_error(&self, err: LinesCodecError) -> ProtocolError {
        match err {
            LinesCodecError::MaxLineLengthExceeded => {
                ProtocolError::LineTooLong(self.max_line_length)
            }
            LinesCodecError::Io(e) if e.kind() == io::ErrorKind::InvalidData => {
                ProtocolError::InvalidUtf8
            }
            LinesCodecError::Io(e) => ProtocolError::Io(e),
        }
    }
}

impl Default for ProtocolCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ProtocolCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        self.lines.decode(src).map_err(|e| self.convert_error(e))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        self.lines.decode_eof(src).map_err(|e| self.convert_error(e))
    }
}

impl Encoder<Response> for ProtocolCodec {
    type Error = ProtocolError;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let line = response.to_string();
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
