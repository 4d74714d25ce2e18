//! Message definitions: the per-local-id field layout a definition record
//! installs, later used by the record decoder to interpret data records
//! (§3 `MessageDefinition`, §4.4 definition parsing).

use crate::errors::ParseError;
use crate::header::StreamReader;

/// Offset added to a developer-data index to form an out-of-band "type code"
/// (≥ 1000) that marks a field as developer-defined rather than a native FIT
/// base type (§3).
pub const DEVELOPER_FIELD_OFFSET: u16 = 1000;

/// One field slot within a message definition: a field number (symbolic name
/// resolved against the static tables, or numeric fallback), its declared
/// byte size, and a type code — either a FIT base type id (< 1000) or
/// `1000 + developer_data_index` for a developer field.
#[derive(Debug, Clone)]
pub struct DefinitionField {
    pub field_number: u8,
    pub name: String,
    pub size: u8,
    pub type_code: u16,
}

impl DefinitionField {
    pub fn is_developer(&self) -> bool {
        self.type_code >= DEVELOPER_FIELD_OFFSET
    }

    /// The developer-data index this field was declared under, if it is a
    /// developer field.
    pub fn developer_data_index(&self) -> Option<u8> {
        if self.is_developer() {
            Some((self.type_code - DEVELOPER_FIELD_OFFSET) as u8)
        } else {
            None
        }
    }
}

/// The field layout registered for one local message id by a definition
/// record: global message id, byte order, and the ordered field list.
#[derive(Debug, Clone)]
pub struct MessageDefinition {
    pub global_id: u16,
    pub message_name: String,
    pub big_endian: bool,
    pub fields: Vec<DefinitionField>,
}

impl MessageDefinition {
    /// Parses a definition message body from `reader`, having already
    /// consumed the record header byte (the reserved byte follows next).
    /// `local_id` and `is_developer` come from the just-decoded header.
    pub fn parse(reader: &mut StreamReader, is_developer: bool, name_fn: impl Fn(u16, u8) -> String, message_name_fn: impl Fn(u16) -> String) -> Result<Self, ParseError> {
        let _reserved = reader.read_u8()?;
        let architecture = reader.read_u8()?;
        let big_endian = architecture != 0;

        let global_id = if big_endian {
            let bytes = reader.read_bytes(2)?;
            u16::from_be_bytes([bytes[0], bytes[1]])
        } else {
            reader.read_u16_le()?
        };
        let message_name = message_name_fn(global_id);

        let field_count = reader.read_u8()?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let field_number = reader.read_u8()?;
            let size = reader.read_u8()?;
            let type_code = reader.read_u8()? as u16;
            let name = name_fn(global_id, field_number);
            fields.push(DefinitionField { field_number, name, size, type_code });
        }

        if is_developer {
            let dev_count = reader.read_u8()?;
            for _ in 0..dev_count {
                let field_number = reader.read_u8()?;
                let size = reader.read_u8()?;
                let ddi = reader.read_u8()?;
                let type_code = DEVELOPER_FIELD_OFFSET + ddi as u16;
                fields.push(DefinitionField {
                    field_number,
                    name: format!("developer_field_{field_number}"),
                    size,
                    type_code,
                });
            }
        }

        Ok(MessageDefinition { global_id, message_name, big_endian, fields })
    }

    /// Total byte size of one data record matching this definition.
    pub fn record_size(&self) -> usize {
        self.fields.iter().map(|f| f.size as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compute_crc;

    fn wrap(mut payload: Vec<u8>) -> StreamReader {
        let mut data = vec![12u8, 16, 0, 0, payload.len() as u8, 0, 0, 0, b'.', b'F', b'I', b'T'];
        data.append(&mut payload);
        let crc = compute_crc(&data);
        data.extend_from_slice(&crc.to_le_bytes());
        StreamReader::new(data).unwrap()
    }

    #[test]
    fn parses_simple_definition() {
        // reserved, arch=0 (LE), global=20 (record), field_count=2,
        // (253,4,0x86) timestamp/uint32, (3,1,0x02) heart_rate/uint8
        let payload = vec![0x00, 0x00, 20, 0, 2, 253, 4, 0x86, 3, 1, 0x02];
        let mut reader = wrap(payload);
        let def = MessageDefinition::parse(&mut reader, false, |_, n| format!("f{n}"), |g| format!("g{g}")).unwrap();
        assert_eq!(def.global_id, 20);
        assert_eq!(def.fields.len(), 2);
        assert_eq!(def.record_size(), 5);
        assert!(!def.fields[0].is_developer());
    }

    #[test]
    fn developer_fields_get_offset_type_code() {
        // field_count=0, dev_field_count=1: (field_number=5, size=4, ddi=2)
        let payload = vec![0x00, 0x00, 20, 0, 0, 1, 5, 4, 2];
        let mut reader = wrap(payload);
        let def = MessageDefinition::parse(&mut reader, true, |_, n| format!("f{n}"), |g| format!("g{g}")).unwrap();
        assert_eq!(def.fields.len(), 1);
        assert!(def.fields[0].is_developer());
        assert_eq!(def.fields[0].developer_data_index(), Some(2));
        assert_eq!(def.fields[0].type_code, 1002);
    }
}
