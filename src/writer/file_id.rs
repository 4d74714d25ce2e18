//! The fixed `file_id`/`file_creator` preamble every writer emits at
//! construction (§4.7): local id 0, never redefined afterward.

use crate::basetype::{UINT16, UINT16Z, UINT32, UINT32Z, UINT8};
use crate::errors::WriteError;
use crate::messages::{GLOBAL_FILE_CREATOR, GLOBAL_FILE_ID};
use crate::value::{FieldValue, Message};
use crate::writer::core::{FieldSpec, WriterCore};

const PREAMBLE_LOCAL_ID: u8 = 0;

/// FIT SDK manufacturer id for "development" tools, i.e. output produced by
/// something other than a registered device — what this writer's own output
/// declares itself as.
pub const DEVELOPMENT_MANUFACTURER: u16 = 1;
/// FIT SDK's reserved "development" product id, paired with
/// [`DEVELOPMENT_MANUFACTURER`] (§8 scenario 2).
pub const DEVELOPMENT_PRODUCT: u16 = 65534;

/// Emits `file_id` (global 0) then `file_creator` (global 49) against
/// `core`, both under local id 0. `manufacturer`/`product` identify this
/// writer's own output rather than a physical device; callers that need to
/// impersonate a specific device use [`write_preamble_as`].
pub fn write_preamble(core: &mut WriterCore, file_type: u8, time_created: i64) -> Result<(), WriteError> {
    write_preamble_as(core, file_type, time_created, DEVELOPMENT_MANUFACTURER, DEVELOPMENT_PRODUCT)
}

/// As [`write_preamble`], but with an explicit manufacturer/product pair.
pub fn write_preamble_as(
    core: &mut WriterCore,
    file_type: u8,
    time_created: i64,
    manufacturer: u16,
    product: u16,
) -> Result<(), WriteError> {
    core.put_definition(
        GLOBAL_FILE_ID,
        PREAMBLE_LOCAL_ID,
        vec![
            FieldSpec::scalar(0, "type", UINT8),
            FieldSpec::scalar(1, "manufacturer", UINT16),
            FieldSpec::scalar(2, "product", UINT16),
            FieldSpec::scalar(3, "serial_number", UINT32Z),
            FieldSpec::scalar(4, "time_created", UINT32),
            FieldSpec::scalar(5, "number", UINT16Z),
        ],
    )?;
    let mut file_id = Message::new();
    file_id.push("type", FieldValue::UInt(file_type as u64));
    file_id.push("manufacturer", FieldValue::UInt(manufacturer as u64));
    file_id.push("product", FieldValue::UInt(product as u64));
    file_id.push("time_created", FieldValue::SInt(time_created));
    core.put_message(GLOBAL_FILE_ID, &file_id)?;

    core.put_definition(
        GLOBAL_FILE_CREATOR,
        PREAMBLE_LOCAL_ID,
        vec![FieldSpec::scalar(0, "software_version", UINT16), FieldSpec::scalar(1, "hardware_version", UINT8)],
    )?;
    core.put_message(GLOBAL_FILE_CREATOR, &Message::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compute_crc;

    #[test]
    fn preamble_alone_is_a_valid_file() {
        let mut core = WriterCore::new();
        write_preamble(&mut core, 2, 123_456).unwrap();
        let buf = core.finalise().unwrap();
        assert_eq!(compute_crc(&buf), 0);
    }
}
