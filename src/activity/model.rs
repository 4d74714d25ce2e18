//! The activity hierarchy produced by [`ActivityBuilder::collect_activity`]
//! (crate::activity::builder): sessions, owning laps, owning lengths, owning
//! trackpoints (§3 `Activity`).

use crate::value::Message;

/// Reads a record's `timestamp` field as `i64`, if present.
pub fn timestamp_of(fields: &Message) -> Option<i64> {
    fields.get("timestamp").and_then(|v| v.as_i64())
}

/// A terminal trackpoint: one decoded `record` message, normalised by
/// `process_fields`.
#[derive(Debug, Clone, Default)]
pub struct TrackRecord {
    pub fields: Message,
}

/// One length of a pool swim (or a synthetic length standing in for a lap
/// with no native length messages).
#[derive(Debug, Clone, Default)]
pub struct Length {
    pub fields: Message,
    pub records: Vec<TrackRecord>,
}

/// One lap: summary fields plus the lengths (each owning its own records)
/// that fell within it.
#[derive(Debug, Clone, Default)]
pub struct Lap {
    pub fields: Message,
    pub lengths: Vec<Length>,
}

/// One session: summary fields, the devices active during it, and its laps.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub fields: Message,
    pub devices: Vec<Message>,
    pub laps: Vec<Lap>,
}

/// The top-level decoded activity.
#[derive(Debug, Clone, Default)]
pub struct Activity {
    pub start_time: Option<i64>,
    pub guid: Option<String>,
    pub developer_data_ids: Vec<Message>,
    pub field_descriptions: Vec<Message>,
    pub training_file: Option<Message>,
    pub sessions: Vec<Session>,
}
