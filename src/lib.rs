//! Reader and writer for the FIT (Flexible and Interoperable Data Transfer)
//! binary container format used by fitness devices.
//!
//! The read path ingests an ACTIVITY file and produces a structured
//! [`activity::Activity`] (sessions, laps, lengths, trackpoints) plus device
//! metadata and developer ("XDATA") field definitions. The write path emits
//! WORKOUT, SPORT, SETTINGS, and generic files through [`writer::WriterCore`]
//! and its specialisations.

#![warn(rust_2018_idioms, missing_copy_implementations)]

pub mod activity;
pub mod basetype;
pub mod codec;
pub mod conversion;
pub mod decoder;
pub mod definition;
pub mod devfield;
pub mod dispatcher;
pub mod errors;
pub mod header;
pub mod messages;
pub mod value;
pub mod writer;

pub use activity::{Activity, ActivityBuilder, BasicSummary, Lap, Length, Session, SummaryComputer, TrackRecord};
pub use basetype::FitType;
pub use conversion::{ConversionDescriptor, ConversionTable};
pub use decoder::RecordDecoder;
pub use definition::MessageDefinition;
pub use devfield::XdataRegistry;
pub use dispatcher::{Clock, Dispatcher};
pub use errors::{ParseError, WriteError};
pub use header::{FitHeader, StreamReader};
pub use value::{FieldValue, Message};
pub use writer::{GenericWriter, SettingsWriter, SportWriter, WorkoutWriter, WriterCore};

use decoder::DecodeEvent;

/// Decodes a complete ACTIVITY file, driving the stream reader → record
/// decoder → event dispatcher → activity builder pipeline end to end, then
/// rolling the result up with `summary`.
///
/// Only the first concatenated FIT chunk in `buf` is decoded (§5
/// non-goals); any trailing bytes after the first file's CRC are ignored.
pub fn read_activity(buf: Vec<u8>, summary: &impl SummaryComputer) -> Result<Activity, ParseError> {
    let mut reader = StreamReader::new(buf)?;
    let mut record_decoder = RecordDecoder::new();
    let mut clock = Clock::new();
    let mut builder = ActivityBuilder::new();

    while !reader.is_eof() {
        match record_decoder.next(&mut reader)? {
            DecodeEvent::DefinitionInstalled => {}
            DecodeEvent::Data(decoded) => dispatcher::dispatch(&mut clock, &mut builder, decoded),
        }
        // The first fatal condition wins: a builder-recorded error (e.g.
        // `NotAnActivity` from an early `file_id`) must be returned even if a
        // later record in the same file would also fail to decode.
        if let Some(err) = builder.error() {
            return Err(clone_parse_error(err));
        }
    }

    Ok(builder.collect_activity(&clock, summary))
}

/// `ParseError` has no `Clone` derive (it wraps `std::io::Error`), so the
/// one place that needs to hand an owned copy back out of a borrowed
/// `Option<&ParseError>` reconstructs the equivalent owned variant instead.
fn clone_parse_error(err: &ParseError) -> ParseError {
    match err {
        ParseError::NotAnActivity { file_type } => ParseError::NotAnActivity { file_type: *file_type },
        ParseError::BadHeader(msg) => ParseError::BadHeader(msg.clone()),
        ParseError::BadCrc { computed } => ParseError::BadCrc { computed: *computed },
        ParseError::ReadPastEnd { pos, len } => ParseError::ReadPastEnd { pos: *pos, len: *len },
        ParseError::UnknownMessageDefinition { local_id } => ParseError::UnknownMessageDefinition { local_id: *local_id },
        ParseError::UnknownDevField { developer_data_index, field_number } => {
            ParseError::UnknownDevField { developer_data_index: *developer_data_index, field_number: *field_number }
        }
        ParseError::UnknownBaseType(id) => ParseError::UnknownBaseType(*id),
        ParseError::BadHeaderByte(byte) => ParseError::BadHeaderByte(*byte),
        ParseError::Utf8(_) | ParseError::Io(_) => {
            ParseError::BadHeader("a prior non-cloneable error was recorded during dispatch".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basetype::{UINT32, UINT8};
    use crate::writer::core::FieldSpec;

    fn encode_file_id_only_activity() -> Vec<u8> {
        let mut core = WriterCore::new();
        core.put_definition(
            messages::GLOBAL_FILE_ID,
            0,
            vec![FieldSpec::scalar(0, "type", UINT8), FieldSpec::scalar(4, "time_created", UINT32)],
        )
        .unwrap();
        let mut data = Message::new();
        data.push("type", FieldValue::UInt(4)); // activity
        data.push("time_created", FieldValue::UInt(1_000));
        core.put_message(messages::GLOBAL_FILE_ID, &data).unwrap();
        core.finalise().unwrap()
    }

    fn encode_non_activity_file() -> Vec<u8> {
        let mut core = WriterCore::new();
        core.put_definition(messages::GLOBAL_FILE_ID, 0, vec![FieldSpec::scalar(0, "type", UINT8)]).unwrap();
        let mut data = Message::new();
        data.push("type", FieldValue::UInt(2)); // settings
        core.put_message(messages::GLOBAL_FILE_ID, &data).unwrap();
        core.finalise().unwrap()
    }

    #[test]
    fn reads_a_minimal_activity_file() {
        let buf = encode_file_id_only_activity();
        let activity = read_activity(buf, &BasicSummary).unwrap();
        assert!(activity.sessions.is_empty());
    }

    #[test]
    fn non_activity_file_is_rejected() {
        let buf = encode_non_activity_file();
        assert!(matches!(read_activity(buf, &BasicSummary), Err(ParseError::NotAnActivity { .. })));
    }
}
