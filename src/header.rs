//! Stream reader: header parsing/validation and the positional "read next
//! value of type T" surface the record decoder is built on (§4.3).

use crate::basetype::{self, FitType};
use crate::codec::compute_crc;
use crate::errors::ParseError;
use crate::value::FieldValue;

const MIN_HEADER_LEN: u8 = 12;
const FIT_SIGNATURE: &[u8; 4] = b".FIT";

/// The parsed fixed-size FIT header.
#[derive(Debug, Clone, Copy)]
pub struct FitHeader {
    pub header_len: u8,
    pub protocol_version: u8,
    pub profile_version: u16,
    pub data_length: u32,
}

impl FitHeader {
    /// Parses and validates the 12 (or 14, with header CRC) leading bytes of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self, ParseError> {
        if buf.len() < MIN_HEADER_LEN as usize {
            return Err(ParseError::BadHeader(format!(
                "buffer too short for a FIT header: {} bytes",
                buf.len()
            )));
        }
        let header_len = buf[0];
        if header_len < MIN_HEADER_LEN {
            return Err(ParseError::BadHeader(format!(
                "header length {header_len} is below the minimum of {MIN_HEADER_LEN}"
            )));
        }
        if buf.len() < header_len as usize {
            return Err(ParseError::BadHeader("buffer shorter than declared header length".to_string()));
        }
        let protocol_version = buf[1];
        let profile_version = u16::from_le_bytes([buf[2], buf[3]]);
        let data_length = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let signature = &buf[8..12];
        if signature != FIT_SIGNATURE {
            return Err(ParseError::BadHeader(format!(
                "missing .FIT signature, found {signature:?}"
            )));
        }
        Ok(FitHeader { header_len, protocol_version, profile_version, data_length })
    }
}

/// Owns the raw file bytes and a positional cursor into the logical data
/// window `[header_len, header_len + data_length)`.
pub struct StreamReader {
    buf: Vec<u8>,
    pos: usize,
    window_end: usize,
    data_length_corrected: bool,
}

impl StreamReader {
    /// Validates the header, the whole-file CRC, and establishes the logical
    /// read window, clamping a firmware-reported `data_length` that is zero
    /// or overruns the buffer rather than rejecting the file outright.
    pub fn new(buf: Vec<u8>) -> Result<Self, ParseError> {
        let header = FitHeader::parse(&buf)?;
        let trailer_len = 2usize;
        let header_len = header.header_len as usize;

        let declared_end = header_len
            .checked_add(header.data_length as usize)
            .ok_or_else(|| ParseError::BadHeader("data length overflowed header_len + data_length".to_string()))?;
        let max_possible_end = buf.len().saturating_sub(trailer_len);

        let (window_end, corrected) = if header.data_length == 0 || declared_end > max_possible_end {
            log::warn!(
                "data_length ({}) is zero or exceeds the bytes present ({} available); clamping logical window to {}",
                header.data_length,
                buf.len(),
                max_possible_end
            );
            (max_possible_end, true)
        } else {
            (declared_end, false)
        };

        if buf.len() < header_len + trailer_len {
            return Err(ParseError::BadHeader(format!(
                "buffer of {} bytes too short to hold header and trailing CRC",
                buf.len()
            )));
        }

        let computed = compute_crc(&buf);
        if computed != 0 {
            return Err(ParseError::BadCrc { computed });
        }

        Ok(StreamReader { buf, pos: header_len, window_end, data_length_corrected: corrected })
    }

    /// Whether the reader had to clamp a zero or over-large `data_length`
    /// (§4.3 supplement); exposed so callers can tell a vendor quirk was
    /// tolerated rather than treated as a hard failure.
    pub fn data_length_was_corrected(&self) -> bool {
        self.data_length_corrected
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.window_end
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.window_end.saturating_sub(self.pos)
    }

    /// Reads a raw byte at the cursor without advancing it (peeking the next
    /// record header byte).
    pub fn peek_u8(&self) -> Result<u8, ParseError> {
        self.buf.get(self.pos).copied().ok_or(ParseError::ReadPastEnd { pos: self.pos, len: self.buf.len() })
    }

    /// Consumes one raw byte and advances the cursor (used by the decoder to
    /// pull record header bytes off the stream).
    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        let b = self.peek_u8()?;
        self.pos += 1;
        Ok(b)
    }

    /// Consumes `n` raw bytes, advancing the cursor, without type interpretation.
    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8], ParseError> {
        let end = self.pos.checked_add(n).ok_or(ParseError::ReadPastEnd { pos: self.pos, len: self.buf.len() })?;
        if end > self.buf.len() {
            return Err(ParseError::ReadPastEnd { pos: self.pos, len: self.buf.len() });
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Reads a raw little-endian `u16` and advances the cursor (definition
    /// message fields — global message number, field counts — are always
    /// read this way regardless of the definition's own endianness).
    pub fn read_u16_le(&mut self) -> Result<u16, ParseError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads one value of FIT type `fit_type` at the cursor, honoring
    /// `big_endian`, applying invalid-sentinel elision (§4.2).
    pub fn read_next(&mut self, fit_type: FitType, big_endian: bool) -> Result<Option<FieldValue>, ParseError> {
        let (value, next) = fit_type.read_one(&self.buf, self.pos, big_endian)?;
        self.pos = next;
        Ok(value)
    }

    /// Reads `total_size` bytes at the cursor as N = total_size / width
    /// elements of `fit_type`, honoring `big_endian`.
    pub fn read_many(&mut self, fit_type: FitType, total_size: usize, big_endian: bool) -> Result<Option<FieldValue>, ParseError> {
        let end = self.pos.checked_add(total_size).ok_or(ParseError::ReadPastEnd { pos: self.pos, len: self.buf.len() })?;
        if end > self.buf.len() {
            return Err(ParseError::ReadPastEnd { pos: self.pos, len: self.buf.len() });
        }
        let (value, next) = fit_type.read_many(&self.buf, self.pos, total_size, big_endian)?;
        self.pos = next;
        Ok(value)
    }

    /// Looks up a base type by its wire id, surfacing `UnknownBaseType` for
    /// anything outside the registry.
    pub fn lookup_type(id: u8) -> Result<FitType, ParseError> {
        basetype::lookup(id).ok_or(ParseError::UnknownBaseType(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_file() -> Vec<u8> {
        let mut data = vec![14u8, 16, 0x2A, 0x05, 0, 0, 0, 0, b'.', b'F', b'I', b'T'];
        let header_crc = compute_crc(&data[0..12]);
        data.extend_from_slice(&header_crc.to_le_bytes());
        let file_crc = compute_crc(&data);
        data.extend_from_slice(&file_crc.to_le_bytes());
        data
    }

    #[test]
    fn minimal_file_is_eof_immediately() {
        let reader = StreamReader::new(minimal_file()).unwrap();
        assert!(reader.is_eof());
    }

    #[test]
    fn bad_crc_is_rejected() {
        let mut data = minimal_file();
        let last = data.len() - 1;
        data[last] ^= 0xFF;
        assert!(matches!(StreamReader::new(data), Err(ParseError::BadCrc { .. })));
    }

    #[test]
    fn short_buffer_is_bad_header() {
        assert!(matches!(StreamReader::new(vec![1, 2, 3]), Err(ParseError::BadHeader(_))));
    }

    #[test]
    fn zero_data_length_clamps_instead_of_failing() {
        // header(14) + some payload bytes + trailing crc(2), but data_length left at 0
        let mut data = vec![14u8, 16, 0x2A, 0x05, 0, 0, 0, 0, b'.', b'F', b'I', b'T'];
        let header_crc = compute_crc(&data[0..12]);
        data.extend_from_slice(&header_crc.to_le_bytes());
        data.extend_from_slice(&[0xAB, 0xCD, 0xEF]);
        let file_crc = compute_crc(&data);
        data.extend_from_slice(&file_crc.to_le_bytes());

        let reader = StreamReader::new(data).unwrap();
        assert!(reader.data_length_was_corrected());
        assert_eq!(reader.remaining(), 3);
    }
}
