//! Decode/encode error types.
//!
//! Kept as hand-rolled enums with manual `Display`/`Error`/`From` impls
//! rather than reaching for a derive-macro error crate: every error here is
//! fatal to the current file, so there is no partial-result variant to
//! thread through.

use std::fmt;

/// Errors raised while reading a FIT file.
#[derive(Debug)]
pub enum ParseError {
    /// Header length < 12, missing `.FIT` signature, or an inconsistent
    /// data length that could not be reconciled with the file size.
    BadHeader(String),
    /// Whole-file CRC did not reduce to zero.
    BadCrc { computed: u16 },
    /// A read would start or end past the readable window.
    ReadPastEnd { pos: usize, len: usize },
    /// A data record referenced a local id with no prior definition.
    UnknownMessageDefinition { local_id: u8 },
    /// A developer-field value referenced an unknown (developer-data-index,
    /// field-number) pair.
    UnknownDevField { developer_data_index: u8, field_number: u8 },
    /// A definition referenced a FIT base type code outside the registry.
    UnknownBaseType(u8),
    /// `file_id.type` was not `activity`.
    NotAnActivity { file_type: Option<i64> },
    /// A record header decoded to an impossible bit pattern for its context.
    BadHeaderByte(u8),
    Utf8(std::str::Utf8Error),
    Io(std::io::Error),
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadHeader(msg) => write!(f, "bad FIT header: {msg}"),
            ParseError::BadCrc { computed } => {
                write!(f, "bad CRC: whole-file CRC reduced to {computed:#06x}, expected 0")
            }
            ParseError::ReadPastEnd { pos, len } => {
                write!(f, "read past end of stream at {pos}, stream has {len} bytes")
            }
            ParseError::UnknownMessageDefinition { local_id } => {
                write!(f, "data record referenced undefined local id {local_id}")
            }
            ParseError::UnknownDevField { developer_data_index, field_number } => write!(
                f,
                "unknown developer field (developer_data_index={developer_data_index}, field_number={field_number})"
            ),
            ParseError::UnknownBaseType(id) => write!(f, "unknown FIT base type {id:#04x}"),
            ParseError::NotAnActivity { file_type } => {
                write!(f, "file_id.type is not 'activity' (got {file_type:?})")
            }
            ParseError::BadHeaderByte(byte) => write!(f, "impossible record header byte {byte:#010b}"),
            ParseError::Utf8(err) => write!(f, "invalid utf-8 in field: {err}"),
            ParseError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        ParseError::Utf8(err)
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err)
    }
}

/// Errors raised while writing a FIT file.
#[derive(Debug)]
pub enum WriteError {
    /// A write would start or end past the buffer.
    WritePastEnd { pos: usize, len: usize },
    /// `put_message` was called for a global id with no prior `put_definition`.
    UnknownMessageDefinition { global_id: u16 },
    /// A field referenced a FIT base type code outside the registry.
    UnknownBaseType(u8),
    Io(std::io::Error),
}

impl std::error::Error for WriteError {}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::WritePastEnd { pos, len } => {
                write!(f, "write past end of buffer at {pos}, buffer has {len} bytes")
            }
            WriteError::UnknownMessageDefinition { global_id } => {
                write!(f, "no definition registered for global message {global_id}")
            }
            WriteError::UnknownBaseType(id) => write!(f, "unknown FIT base type {id:#04x}"),
            WriteError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl From<std::io::Error> for WriteError {
    fn from(err: std::io::Error) -> Self {
        WriteError::Io(err)
    }
}
