//! Record decoder (§4.4): record header decoding, per-local-id message
//! definitions, and decoding of data records into [`Message`]s routed to an
//! event dispatcher.

use std::collections::HashMap;

use crate::basetype;
use crate::conversion::ConversionTable;
use crate::definition::{self, MessageDefinition};
use crate::devfield::{hex_encode, stable_key};
use crate::errors::ParseError;
use crate::header::StreamReader;
use crate::messages;
use crate::value::{FieldValue, Message};

/// One decoded record header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordHeader {
    Definition { local_id: u8, is_developer: bool },
    Data { local_id: u8 },
    CompressedData { local_id: u8, offset: u8 },
}

/// Decodes a single record header byte per §4.4.
pub fn decode_header(byte: u8) -> RecordHeader {
    if byte & 0x80 != 0 {
        let local_id = (byte >> 5) & 0x03;
        let offset = byte & 0x1F;
        RecordHeader::CompressedData { local_id, offset }
    } else if byte & 0x40 != 0 {
        let local_id = byte & 0x0F;
        let is_developer = byte & 0x20 != 0;
        RecordHeader::Definition { local_id, is_developer }
    } else {
        let local_id = byte & 0x0F;
        RecordHeader::Data { local_id }
    }
}

/// A fully decoded data record, ready for dispatch.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub global_id: u16,
    pub message_name: String,
    pub fields: Message,
}

/// One step of decoding: either a definition record was consumed (nothing to
/// dispatch yet) or a data record produced a [`DecodedMessage`].
pub enum DecodeEvent {
    DefinitionInstalled,
    Data(DecodedMessage),
}

/// Consumes bytes from a [`StreamReader`], maintaining local-id →
/// [`MessageDefinition`] and developer-field type tables, and decodes each
/// record into an ordered [`Message`].
pub struct RecordDecoder {
    defs: HashMap<u8, MessageDefinition>,
    /// (1000 + developer_data_index, field_number) -> (stable key, FIT base type id)
    dev_field_types: HashMap<(u16, u8), (String, u8)>,
    /// developer_data_index -> application guid (lowercase hex)
    app_defs: HashMap<u8, String>,
    conversions: ConversionTable,
}

impl Default for RecordDecoder {
    fn default() -> Self {
        RecordDecoder {
            defs: HashMap::new(),
            dev_field_types: HashMap::new(),
            app_defs: HashMap::new(),
            conversions: ConversionTable::default(),
        }
    }
}

impl RecordDecoder {
    pub fn new() -> Self {
        RecordDecoder::default()
    }

    /// As [`RecordDecoder::new`], but decoding scaled fields through a
    /// caller-supplied conversion table instead of the built-in defaults.
    pub fn with_conversions(conversions: ConversionTable) -> Self {
        RecordDecoder { conversions, ..RecordDecoder::default() }
    }

    /// Decodes the next record from `reader`: installs a definition, or
    /// decodes and returns one data record.
    pub fn next(&mut self, reader: &mut StreamReader) -> Result<DecodeEvent, ParseError> {
        let header_byte = reader.read_u8()?;
        match decode_header(header_byte) {
            RecordHeader::Definition { local_id, is_developer } => {
                let def = MessageDefinition::parse(reader, is_developer, messages::field_name, messages::message_name)?;
                self.defs.insert(local_id, def);
                Ok(DecodeEvent::DefinitionInstalled)
            }
            RecordHeader::Data { local_id } => {
                let msg = self.decode_data_record(reader, local_id, None)?;
                Ok(DecodeEvent::Data(msg))
            }
            RecordHeader::CompressedData { local_id, offset } => {
                let msg = self.decode_data_record(reader, local_id, Some(offset))?;
                Ok(DecodeEvent::Data(msg))
            }
        }
    }

    fn decode_data_record(&mut self, reader: &mut StreamReader, local_id: u8, compressed_offset: Option<u8>) -> Result<DecodedMessage, ParseError> {
        let def = self.defs.get(&local_id).ok_or(ParseError::UnknownMessageDefinition { local_id })?.clone();
        let global_id = def.global_id;

        let mut fields = Message::new();
        for field in &def.fields {
            if field.is_developer() {
                let ddi = field.developer_data_index().expect("is_developer implies developer_data_index");
                let key = (field.type_code, field.field_number);
                let (name, base_type_id) = self
                    .dev_field_types
                    .get(&key)
                    .cloned()
                    .ok_or(ParseError::UnknownDevField { developer_data_index: ddi, field_number: field.field_number })?;
                let fit_type = basetype::lookup(base_type_id).ok_or(ParseError::UnknownBaseType(base_type_id))?;
                if let Some(value) = reader.read_many(fit_type, field.size as usize, def.big_endian)? {
                    fields.push(name, value);
                }
                continue;
            }

            // developer_data_id (207): developer_id (0) / application_id (1) are
            // rendered as lowercase hex strings rather than raw byte vectors.
            if global_id == messages::GLOBAL_DEVELOPER_DATA_ID && (field.field_number == 0 || field.field_number == 1) {
                let raw = reader.read_bytes(field.size as usize)?.to_vec();
                fields.push(field.name.clone(), FieldValue::Text(hex_encode(&raw)));
                continue;
            }

            let fit_type = basetype::lookup(field.type_code as u8).ok_or(ParseError::UnknownBaseType(field.type_code as u8))?;
            if let Some(value) = reader.read_many(fit_type, field.size as usize, def.big_endian)? {
                let value = self.conversions.apply(global_id, &field.name, value);
                fields.push(field.name.clone(), value);
            }
        }

        if let Some(offset) = compressed_offset {
            fields.push("compressed_timestamp", FieldValue::UInt(offset as u64));
        }

        if global_id == messages::GLOBAL_DEVELOPER_DATA_ID {
            self.apply_developer_data_id(&fields);
        } else if global_id == messages::GLOBAL_FIELD_DESCRIPTION {
            self.apply_field_description(&mut fields);
        }

        Ok(DecodedMessage { global_id, message_name: def.message_name.clone(), fields })
    }

    /// Records the application guid for a `developer_data_id` message's
    /// developer-data index, so later `field_description` messages under the
    /// same index can resolve a guid-qualified stable key.
    fn apply_developer_data_id(&mut self, fields: &Message) {
        let ddi = fields.get("developer_data_index").and_then(|v| v.as_i64());
        let app_id = fields.get("application_id").and_then(|v| v.as_str()).map(|s| s.to_string());
        if let (Some(ddi), Some(app_id)) = (ddi, app_id) {
            self.app_defs.insert(ddi as u8, app_id);
        }
    }

    /// Computes the stable key for a `field_description` message (§4.8),
    /// registers it in `dev_field_types`, and attaches a `field-key` entry so
    /// downstream lookups don't need to recompute it.
    fn apply_field_description(&mut self, fields: &mut Message) {
        let ddi = fields.get("developer_data_index").and_then(|v| v.as_i64()).map(|v| v as u8);
        let field_number = fields.get("field_definition_number").and_then(|v| v.as_i64()).map(|v| v as u8);
        let base_type_id = fields.get("fit_base_type_id").and_then(|v| v.as_i64()).map(|v| v as u8);
        let name = fields.get("field_name").and_then(|v| v.as_str()).map(|s| s.to_string());

        if let (Some(ddi), Some(field_number), Some(base_type_id), Some(name)) = (ddi, field_number, base_type_id, name) {
            let app_guid = self.app_defs.get(&ddi).map(|s| s.as_str());
            let key = stable_key(app_guid, field_number, &name);
            self.dev_field_types.insert((definition::DEVELOPER_FIELD_OFFSET + ddi as u16, field_number), (key.clone(), base_type_id));
            fields.push("field_key", FieldValue::Text(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_definition_header() {
        assert_eq!(decode_header(0x40), RecordHeader::Definition { local_id: 0, is_developer: false });
        assert_eq!(decode_header(0x60), RecordHeader::Definition { local_id: 0, is_developer: true });
    }

    #[test]
    fn normal_data_header() {
        assert_eq!(decode_header(0x03), RecordHeader::Data { local_id: 3 });
    }

    #[test]
    fn compressed_timestamp_header() {
        // top bit set, local id bits 5-6 = 01, offset = 0b01011 = 11
        let byte = 0b1010_1011;
        assert_eq!(decode_header(byte), RecordHeader::CompressedData { local_id: 1, offset: 11 });
    }

    #[test]
    fn unknown_local_id_is_an_error() {
        let mut data = vec![12u8, 16, 0, 0, 1, 0, 0, 0, b'.', b'F', b'I', b'T', 0x03];
        let crc = crate::codec::compute_crc(&data);
        data.extend_from_slice(&crc.to_le_bytes());
        let mut reader = StreamReader::new(data).unwrap();
        let mut decoder = RecordDecoder::new();
        assert!(matches!(decoder.next(&mut reader), Err(ParseError::UnknownMessageDefinition { local_id: 3 })));
    }

    #[test]
    fn default_conversion_table_scales_a_record_speed_field() {
        use crate::basetype::UINT16;
        use crate::writer::core::{FieldSpec, WriterCore};

        let mut writer = WriterCore::new();
        writer.put_definition(messages::GLOBAL_RECORD, 0, vec![FieldSpec::scalar(6, "speed", UINT16)]).unwrap();
        let mut data = Message::new();
        data.push("speed", FieldValue::UInt(5000)); // 5.0 m/s at scale 1000
        writer.put_message(messages::GLOBAL_RECORD, &data).unwrap();
        let buf = writer.finalise().unwrap();

        let mut reader = StreamReader::new(buf).unwrap();
        let mut decoder = RecordDecoder::new();
        assert!(matches!(decoder.next(&mut reader), Ok(DecodeEvent::DefinitionInstalled)));
        match decoder.next(&mut reader).unwrap() {
            DecodeEvent::Data(decoded) => assert_eq!(decoded.fields.get("speed").unwrap().as_f64(), Some(5.0)),
            DecodeEvent::DefinitionInstalled => panic!("expected a data record"),
        }
    }

    #[test]
    fn empty_conversion_table_leaves_values_raw() {
        use crate::basetype::UINT16;
        use crate::conversion::ConversionTable;
        use crate::writer::core::{FieldSpec, WriterCore};

        let mut writer = WriterCore::new();
        writer.put_definition(messages::GLOBAL_RECORD, 0, vec![FieldSpec::scalar(6, "speed", UINT16)]).unwrap();
        let mut data = Message::new();
        data.push("speed", FieldValue::UInt(5000));
        writer.put_message(messages::GLOBAL_RECORD, &data).unwrap();
        let buf = writer.finalise().unwrap();

        let mut reader = StreamReader::new(buf).unwrap();
        let mut decoder = RecordDecoder::with_conversions(ConversionTable::new());
        decoder.next(&mut reader).unwrap();
        match decoder.next(&mut reader).unwrap() {
            DecodeEvent::Data(decoded) => assert_eq!(decoded.fields.get("speed").unwrap().as_i64(), Some(5000)),
            DecodeEvent::DefinitionInstalled => panic!("expected a data record"),
        }
    }
}
