//! Writer core (§4.7): the inverse of the record decoder. Owns a growing
//! output buffer, registers per-global-id message definitions, encodes data
//! records against them, and finalises the header and trailing CRC.
//!
//! Shaped after the checksumming writer in `mshroyer-coursepointer`'s
//! `fit.rs`: the same CRC table and running-checksum-over-a-write
//! discipline, and the same header-then-body-then-trailing-CRC shape,
//! just backfilled over an in-memory buffer instead of a streaming wrapper.

use std::collections::HashMap;

use crate::basetype::FitType;
use crate::codec::{compute_crc, write_int};
use crate::errors::WriteError;
use crate::value::{FieldValue, Message};

/// FIT protocol version byte (2.0).
const FIT_PROTOCOL_VERSION: u8 = 0x20;
/// FIT profile version (21.00), the generation the rest of this crate's
/// message/field tables were transcribed against.
const FIT_PROFILE_VERSION: u16 = 2100;
const HEADER_RESERVED_LEN: usize = 14;

/// One field slot in a registered write-side definition.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field_number: u8,
    pub name: String,
    pub fit_type: FitType,
    /// Number of repeated elements (1 for a scalar field).
    pub count: u8,
}

impl FieldSpec {
    pub fn scalar(field_number: u8, name: impl Into<String>, fit_type: FitType) -> Self {
        FieldSpec { field_number, name: name.into(), fit_type, count: 1 }
    }

    fn byte_size(&self) -> u8 {
        self.count * self.fit_type.width
    }
}

#[derive(Debug, Clone)]
struct WriteDefinition {
    local_id: u8,
    fields: Vec<FieldSpec>,
}

/// Growing output buffer plus the global-id → definition table a writer
/// accumulates before `finalise`.
pub struct WriterCore {
    buf: Vec<u8>,
    mark: usize,
    big_endian: bool,
    defs: HashMap<u16, WriteDefinition>,
}

impl Default for WriterCore {
    fn default() -> Self {
        WriterCore::new()
    }
}

impl WriterCore {
    pub fn new() -> Self {
        WriterCore { buf: vec![0u8; HEADER_RESERVED_LEN], mark: HEADER_RESERVED_LEN, big_endian: false, defs: HashMap::new() }
    }

    fn ensure_capacity(&mut self, additional: usize) {
        let needed = self.mark + additional;
        if self.buf.len() < needed {
            self.buf.resize(needed, 0);
        }
    }

    fn push_u8(&mut self, value: u8) -> Result<(), WriteError> {
        self.ensure_capacity(1);
        write_int(&mut self.buf, self.mark, value as i64, 1, false, false)?;
        self.mark += 1;
        Ok(())
    }

    fn push_u16(&mut self, value: u16) -> Result<(), WriteError> {
        self.ensure_capacity(2);
        write_int(&mut self.buf, self.mark, value as i64, 2, false, self.big_endian)?;
        self.mark += 2;
        Ok(())
    }

    /// Registers `fields` under `global_id`/`local_id` and emits the
    /// definition record. Any earlier definition for `global_id` is
    /// replaced (local ids may be reused across distinct global messages).
    pub fn put_definition(&mut self, global_id: u16, local_id: u8, fields: Vec<FieldSpec>) -> Result<(), WriteError> {
        self.push_u8(0x40 | (local_id & 0x0F))?;
        self.push_u8(0)?; // reserved
        self.push_u8(if self.big_endian { 1 } else { 0 })?;
        self.push_u16(global_id)?;
        self.push_u8(fields.len() as u8)?;
        for field in &fields {
            self.push_u8(field.field_number)?;
            self.push_u8(field.byte_size())?;
            self.push_u8(field.fit_type.id)?;
        }
        self.defs.insert(global_id, WriteDefinition { local_id, fields });
        Ok(())
    }

    /// Encodes one data record against `global_id`'s registered definition.
    /// Fields missing from `data`, or present but with the wrong shape, are
    /// encoded as the type's invalid sentinel.
    pub fn put_message(&mut self, global_id: u16, data: &Message) -> Result<(), WriteError> {
        let def = self.defs.get(&global_id).ok_or(WriteError::UnknownMessageDefinition { global_id })?.clone();
        self.push_u8(def.local_id)?;

        let total: usize = def.fields.iter().map(|f| f.byte_size() as usize).sum();
        self.ensure_capacity(total);

        for field in &def.fields {
            let value = data.get(&field.name);
            if field.count <= 1 {
                let pos = self.mark;
                field.fit_type.write_one(&mut self.buf, pos, value, self.big_endian)?;
                self.mark += field.fit_type.width as usize;
            } else {
                self.write_vector_field(field, value)?;
            }
        }
        Ok(())
    }

    fn write_vector_field(&mut self, field: &FieldSpec, value: Option<&FieldValue>) -> Result<(), WriteError> {
        for i in 0..field.count as usize {
            let element = match value {
                Some(FieldValue::SIntVec(v)) => v.get(i).copied().flatten().map(FieldValue::SInt),
                Some(FieldValue::UIntVec(v)) => v.get(i).copied().flatten().map(FieldValue::UInt),
                Some(FieldValue::FloatVec(v)) => v.get(i).copied().flatten().map(FieldValue::Float),
                _ => None,
            };
            let pos = self.mark;
            field.fit_type.write_one(&mut self.buf, pos, element.as_ref(), self.big_endian)?;
            self.mark += field.fit_type.width as usize;
        }
        Ok(())
    }

    /// Writes the 14-byte header, backfills the data-length word, and
    /// appends the trailing whole-file CRC. Consumes `self`, since no
    /// further writes are meaningful afterward.
    pub fn finalise(mut self) -> Result<Vec<u8>, WriteError> {
        self.buf[0] = HEADER_RESERVED_LEN as u8;
        self.buf[1] = FIT_PROTOCOL_VERSION;
        self.buf[2..4].copy_from_slice(&FIT_PROFILE_VERSION.to_le_bytes());
        let data_length = (self.mark - HEADER_RESERVED_LEN) as u32;
        self.buf[4..8].copy_from_slice(&data_length.to_le_bytes());
        self.buf[8..12].copy_from_slice(b".FIT");
        let header_crc = compute_crc(&self.buf[0..12]);
        self.buf[12..14].copy_from_slice(&header_crc.to_le_bytes());

        self.buf.truncate(self.mark);
        let file_crc = compute_crc(&self.buf);
        self.buf.extend_from_slice(&file_crc.to_le_bytes());
        Ok(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basetype::{UINT16, UINT32, UINT8};

    #[test]
    fn finalised_buffer_has_zero_crc() {
        let mut writer = WriterCore::new();
        writer
            .put_definition(0, 0, vec![FieldSpec::scalar(0, "type", UINT8), FieldSpec::scalar(3, "serial_number", UINT32)])
            .unwrap();
        let mut data = Message::new();
        data.push("type", FieldValue::UInt(4));
        data.push("serial_number", FieldValue::UInt(12345));
        writer.put_message(0, &data).unwrap();

        let buf = writer.finalise().unwrap();
        assert_eq!(compute_crc(&buf), 0);
    }

    #[test]
    fn missing_field_writes_invalid_sentinel() {
        let mut writer = WriterCore::new();
        writer.put_definition(20, 1, vec![FieldSpec::scalar(3, "heart_rate", UINT8)]).unwrap();
        let data = Message::new();
        writer.put_message(20, &data).unwrap();
        let buf = writer.finalise().unwrap();
        // definition(8 bytes) + data header(1) + heart_rate byte = last payload byte before CRC
        assert_eq!(buf[HEADER_RESERVED_LEN + 8 + 1], 0xFF);
    }

    #[test]
    fn unknown_definition_is_an_error() {
        let mut writer = WriterCore::new();
        let data = Message::new();
        assert!(matches!(writer.put_message(999, &data), Err(WriteError::UnknownMessageDefinition { global_id: 999 })));
    }

    #[test]
    fn redefinition_replaces_prior_local_id() {
        let mut writer = WriterCore::new();
        writer.put_definition(18, 0, vec![FieldSpec::scalar(5, "sport", UINT8)]).unwrap();
        writer.put_definition(18, 0, vec![FieldSpec::scalar(253, "timestamp", UINT16)]).unwrap();
        let mut data = Message::new();
        data.push("timestamp", FieldValue::UInt(42));
        assert!(writer.put_message(18, &data).is_ok());
    }
}
