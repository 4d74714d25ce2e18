//! Activity builder (§4.6): the concrete [`Dispatcher`] that accumulates
//! decoded records into the activity hierarchy, applies the derived-field
//! rules and vendor fix-ups, and emits the final [`Activity`] via
//! `collect_activity`.

use std::collections::VecDeque;

use crate::activity::model::{timestamp_of, Activity, Lap, Length, Session, TrackRecord};
use crate::activity::summary::SummaryComputer;
use crate::dispatcher::{Clock, Dispatcher};
use crate::errors::ParseError;
use crate::value::{FieldValue, Message};

const FILE_TYPE_ACTIVITY: i64 = 4;

/// Event/event-type numeric codes this crate needs to recognise for
/// timer-pause bookkeeping (§4.6 `on-event`). Kept as local constants rather
/// than a public enum since no other module names these symbolically.
const EVENT_TIMER: i64 = 0;
const EVENT_TYPE_START: i64 = 0;
const EVENT_TYPE_STOP_ALL: i64 = 4;

/// Applies the derived-field rules (§4.6 `process_fields`) to `fields` in
/// place: each rule prepends a non-null computed value under its target
/// name, displacing whatever was already there under that name.
pub fn process_fields(fields: &mut Message) {
    derive_fallback(fields, "start_time", "timestamp");
    derive_cadence_fusion(fields, "cadence", "fractional_cadence", None);
    derive_cadence_fusion(fields, "avg_cadence", "avg_fractional_cadence", Some("avg_swimming_cadence"));
    derive_cadence_fusion(fields, "max_cadence", "max_fractional_cadence", None);
    derive_fallback(fields, "total_cycles", "total_strokes");
    derive_fallback(fields, "left_right_balance", "stance_time_balance");

    for (target_prefix, source_field) in POWER_PHASE_FIELDS {
        derive_power_phase(fields, target_prefix, source_field);
    }
}

/// `target <- target or fallback`: if `target` is absent, copy `fallback`'s
/// value under `target`'s name.
fn derive_fallback(fields: &mut Message, target: &str, fallback: &str) {
    if fields.get(target).is_some() {
        return;
    }
    if let Some(v) = fields.get(fallback).cloned() {
        fields.prepend(target, v);
    }
}

/// `target <- target + frac` when both are numeric, else `target <- target`
/// (or, when `preferred` is given and present, `preferred` instead of
/// `target` is used as the base value — the `avg-swimming-cadence`
/// preference for `avg-cadence`).
fn derive_cadence_fusion(fields: &mut Message, target: &str, frac: &str, preferred: Option<&str>) {
    let base = preferred
        .and_then(|p| fields.get(p).and_then(|v| v.as_f64()))
        .or_else(|| fields.get(target).and_then(|v| v.as_f64()));
    let frac_value = fields.get(frac).and_then(|v| v.as_f64());
    let fused = match (base, frac_value) {
        (Some(b), Some(f)) => Some(b + f),
        (Some(b), None) => Some(b),
        (None, _) => None,
    };
    if let Some(v) = fused {
        fields.prepend(target, FieldValue::Float(v));
    }
    fields.remove(frac);
}

const POWER_PHASE_FIELDS: &[(&str, &str)] = &[
    ("left_pp", "left_power_phase"),
    ("left_ppp", "left_power_phase_peak"),
    ("right_pp", "right_power_phase"),
    ("right_ppp", "right_power_phase_peak"),
    ("avg_left_pp", "avg_left_power_phase"),
    ("avg_left_ppp", "avg_left_power_phase_peak"),
    ("avg_right_pp", "avg_right_power_phase"),
    ("avg_right_ppp", "avg_right_power_phase_peak"),
];

/// Extracts index 0/1 from `source_field`'s vector value as
/// `<target_prefix>_start` / `<target_prefix>_end`, converting FIT's 0-255
/// phase units to degrees (×360/256).
fn derive_power_phase(fields: &mut Message, target_prefix: &str, source_field: &str) {
    let Some(value) = fields.get(source_field) else { return };
    let start = value.element_f64(0).map(|v| v * 360.0 / 256.0);
    let end = value.element_f64(1).map(|v| v * 360.0 / 256.0);
    if let Some(start) = start {
        fields.prepend(format!("{target_prefix}_start"), FieldValue::Float(start));
    }
    if let Some(end) = end {
        fields.prepend(format!("{target_prefix}_end"), FieldValue::Float(end));
    }
}

/// Concrete [`Dispatcher`] that accumulates the activity hierarchy.
#[derive(Default)]
pub struct ActivityBuilder {
    sessions: Vec<Session>,
    laps: Vec<Lap>,
    lengths: Vec<Length>,
    records: Vec<TrackRecord>,
    devices: Vec<Message>,
    sport: Option<Message>,
    training_file: Option<Message>,
    developer_data_ids: Vec<Message>,
    field_descriptions: Vec<Message>,
    activity_timestamp: Option<i64>,
    activity_guid: Option<String>,
    timer_paused: bool,
    error: Option<ParseError>,
}

impl ActivityBuilder {
    pub fn new() -> Self {
        ActivityBuilder::default()
    }

    /// The first error raised by a handler (currently only `on_file_id`'s
    /// `NotAnActivity` check), if any. `dispatch` has no way to propagate a
    /// `Result` through the `Dispatcher` trait's infallible methods, so
    /// handlers record the first failure here for the caller to check after
    /// the decode loop finishes.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Attaches the lengths/records accumulated since the last lap onto a
    /// lap's field set, by one of the four cases in §4.6, and pushes the
    /// finished lap.
    fn attach_lap(&mut self, fields: Message) {
        let mut lengths = std::mem::take(&mut self.lengths);
        let mut records = std::mem::take(&mut self.records);

        if lengths.is_empty() && records.is_empty() {
            // case 1: nothing to attach
        } else if lengths.is_empty() {
            // case 2: synthesize one length carrying every record, in order
            lengths.push(Length { fields: Message::new(), records: std::mem::take(&mut records) });
        } else if lengths.len() == records.len() {
            // case 3: Garmin-Swim positional pairing
            for (length, record) in lengths.iter_mut().zip(records.drain(..)) {
                length.records.push(record);
            }
        } else {
            // case 4: sort both by timestamp, assign each length its prefix of records
            lengths.sort_by_key(|l| timestamp_of(&l.fields).unwrap_or(i64::MAX));
            records.sort_by_key(|r| timestamp_of(&r.fields).unwrap_or(i64::MAX));
            let mut records: VecDeque<TrackRecord> = records.into();
            for length in lengths.iter_mut() {
                let lap_ts = timestamp_of(&length.fields).unwrap_or(i64::MAX);
                while let Some(front_ts) = records.front().map(|r| timestamp_of(&r.fields).unwrap_or(i64::MAX)) {
                    if front_ts <= lap_ts {
                        length.records.push(records.pop_front().unwrap());
                    } else {
                        break;
                    }
                }
            }
            if !records.is_empty() {
                log::warn!("{} leftover records after assigning lengths to a lap; dropping", records.len());
            }
        }

        self.laps.push(Lap { fields, lengths });
    }

    /// The seven-step finalisation: folds any trailing unassigned
    /// records/lengths into a synthetic lap, assigns laps to sessions,
    /// synthesizes a trailing session for any still-unassigned laps, and
    /// emits the final [`Activity`].
    pub fn collect_activity(mut self, clock: &Clock, summary: &impl SummaryComputer) -> Activity {
        // Step 1: single-session files whose session header precedes all data.
        if self.sessions.len() == 1 {
            let session_ts = timestamp_of(&self.sessions[0].fields);
            let start_time = self.sessions[0].fields.get("start_time").and_then(|v| v.as_i64());
            if session_ts.is_some() && session_ts == start_time {
                if let Some(current) = clock.current_timestamp {
                    self.sessions[0].fields.prepend("timestamp", FieldValue::SInt(current));
                }
            }
        }

        // Step 2: fold leftover records/lengths into a synthetic terminal lap.
        if !self.records.is_empty() || !self.lengths.is_empty() {
            let lengths_ref = self.lengths.clone();
            let records_ref = self.records.clone();
            let summary_fields = summary.compute_summary(&records_ref, &lengths_ref, &[], &[]);

            let mut fields = Message::new();
            if let Some(current) = clock.current_timestamp {
                fields.push("timestamp", FieldValue::SInt(current));
            }
            for (name, value) in summary_fields.into_iter() {
                fields.prepend(name, value);
            }
            self.attach_lap(fields);
        }

        // Step 3: chronological order.
        self.laps.reverse();

        // Step 4: assign laps to sessions, session timestamps ascending.
        self.sessions.sort_by_key(|s| timestamp_of(&s.fields).unwrap_or(i64::MAX));
        let mut laps: VecDeque<Lap> = std::mem::take(&mut self.laps).into();
        for session in self.sessions.iter_mut() {
            let session_ts = timestamp_of(&session.fields).unwrap_or(i64::MAX);
            while let Some(front_ts) = laps.front().map(|l| timestamp_of(&l.fields).unwrap_or(i64::MAX)) {
                if front_ts <= session_ts {
                    session.laps.push(laps.pop_front().unwrap());
                } else {
                    break;
                }
            }
        }

        // Step 5: synthesize a trailing session for any still-unassigned laps.
        if !laps.is_empty() {
            let remaining: Vec<Lap> = laps.into();
            let summary_fields = summary.compute_summary(&[], &[], &remaining, &self.sessions);
            let mut fields = Message::new();
            fields.push("sport", FieldValue::Text("generic".to_string()));
            for (name, value) in summary_fields.into_iter() {
                fields.prepend(name, value);
            }
            self.sessions.push(Session { fields, devices: Vec::new(), laps: remaining });
        }

        // Step 6: prepend any still-unassigned devices onto the last session.
        if !self.devices.is_empty() {
            if let Some(last) = self.sessions.last_mut() {
                let mut devices = std::mem::take(&mut self.devices);
                devices.append(&mut last.devices);
                last.devices = devices;
            }
        }

        // Step 7: emit the final activity.
        Activity {
            start_time: self.activity_timestamp.or(clock.start_timestamp),
            guid: self.activity_guid,
            developer_data_ids: self.developer_data_ids,
            field_descriptions: self.field_descriptions,
            training_file: self.training_file,
            sessions: self.sessions,
        }
    }
}

impl Dispatcher for ActivityBuilder {
    fn on_file_id(&mut self, fields: Message) {
        let file_type = fields.get("type").and_then(|v| v.as_i64());
        if file_type != Some(FILE_TYPE_ACTIVITY) {
            self.error.get_or_insert(ParseError::NotAnActivity { file_type });
            return;
        }
        if self.activity_guid.is_none() {
            let serial = fields.get("serial_number").and_then(|v| v.as_i64()).unwrap_or(0);
            let created = fields.get("time_created").and_then(|v| v.as_i64()).unwrap_or(0);
            self.activity_guid = Some(format!("{serial}-{created}"));
        }
    }

    fn on_file_creator(&mut self, _fields: Message) {}

    fn on_activity(&mut self, fields: Message) {
        self.activity_timestamp = timestamp_of(&fields);
    }

    fn on_session(&mut self, mut fields: Message) {
        process_fields(&mut fields);
        if let Some(sport) = self.sport.take() {
            for key in ["sport", "sub_sport", "pool_length", "pool_length_unit"] {
                if let Some(v) = sport.get(key) {
                    fields.prepend(key, v.clone());
                }
            }
        }
        let devices = std::mem::take(&mut self.devices);
        self.sessions.push(Session { fields, devices, laps: Vec::new() });
        self.sport = None;
    }

    fn on_lap(&mut self, mut fields: Message) {
        process_fields(&mut fields);
        self.attach_lap(fields);
    }

    fn on_record(&mut self, mut fields: Message) {
        process_fields(&mut fields);
        let same_timestamp = self
            .records
            .last()
            .map(|r| timestamp_of(&r.fields) == timestamp_of(&fields) && timestamp_of(&fields).is_some())
            .unwrap_or(false);
        if same_timestamp {
            self.records.last_mut().unwrap().fields.append(fields);
        } else {
            self.records.push(TrackRecord { fields });
        }
    }

    fn on_length(&mut self, mut fields: Message) {
        process_fields(&mut fields);
        self.lengths.push(Length { fields, records: Vec::new() });
    }

    fn on_device_info(&mut self, fields: Message) {
        self.devices.push(fields);
    }

    fn on_location(&mut self, _fields: Message) {}

    fn on_workout(&mut self, _fields: Message) {}

    fn on_workout_step(&mut self, _fields: Message) {}

    fn on_sport(&mut self, fields: Message) {
        self.sport = Some(fields);
    }

    fn on_hrv(&mut self, _fields: Message) {}

    fn on_developer_data_id(&mut self, fields: Message) {
        self.developer_data_ids.push(fields);
    }

    fn on_field_description(&mut self, fields: Message) {
        self.field_descriptions.push(fields);
    }

    fn on_training_file(&mut self, fields: Message) {
        self.training_file = Some(fields);
    }

    fn on_event(&mut self, fields: Message) {
        let event = fields.get("event").and_then(|v| v.as_i64());
        let event_type = fields.get("event_type").and_then(|v| v.as_i64());
        match (event, event_type) {
            (Some(EVENT_TIMER), Some(EVENT_TYPE_STOP_ALL)) => self.timer_paused = true,
            (Some(EVENT_TIMER), Some(EVENT_TYPE_START)) => self.timer_paused = false,
            _ => {}
        }
    }

    fn on_other(&mut self, _global_id: u16, _message_name: String, _fields: Message) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::summary::BasicSummary;

    fn msg_with_ts(ts: i64) -> Message {
        let mut m = Message::new();
        m.push("timestamp", FieldValue::SInt(ts));
        m
    }

    #[test]
    fn cadence_fusion_combines_fractional_part() {
        let mut fields = Message::new();
        fields.push("cadence", FieldValue::UInt(85));
        fields.push("fractional_cadence", FieldValue::Float(0.5));
        process_fields(&mut fields);
        assert_eq!(fields.get("cadence").unwrap().as_f64(), Some(85.5));
        assert!(fields.get("fractional_cadence").is_none());
    }

    #[test]
    fn garmin_swim_pairing_is_positional() {
        let mut builder = ActivityBuilder::new();
        for ts in [100, 110, 120] {
            builder.on_length(msg_with_ts(ts));
        }
        for _ in 0..3 {
            builder.on_record(msg_with_ts(999));
        }
        builder.on_lap(msg_with_ts(130));
        let lap = builder.laps.last().unwrap();
        assert_eq!(lap.lengths.len(), 3);
        for length in &lap.lengths {
            assert_eq!(length.records.len(), 1);
            assert_eq!(timestamp_of(&length.records[0].fields), Some(999));
        }
    }

    #[test]
    fn no_lengths_synthesizes_single_length_with_all_records() {
        let mut builder = ActivityBuilder::new();
        builder.on_record(msg_with_ts(1));
        builder.on_record(msg_with_ts(2));
        builder.on_lap(msg_with_ts(3));
        let lap = builder.laps.last().unwrap();
        assert_eq!(lap.lengths.len(), 1);
        assert_eq!(lap.lengths[0].records.len(), 2);
    }

    #[test]
    fn not_an_activity_is_recorded_as_an_error() {
        let mut builder = ActivityBuilder::new();
        let mut fields = Message::new();
        fields.push("type", FieldValue::UInt(5));
        builder.on_file_id(fields);
        assert!(matches!(builder.error(), Some(ParseError::NotAnActivity { .. })));
    }

    #[test]
    fn hierarchy_closure_after_collect() {
        let mut builder = ActivityBuilder::new();
        let mut file_id = Message::new();
        file_id.push("type", FieldValue::UInt(4));
        builder.on_file_id(file_id);
        builder.on_record(msg_with_ts(10));
        builder.on_lap(msg_with_ts(20));
        builder.on_session(msg_with_ts(20));

        let clock = Clock { start_timestamp: Some(10), current_timestamp: Some(20) };
        let activity = builder.collect_activity(&clock, &BasicSummary);
        assert_eq!(activity.sessions.len(), 1);
        assert_eq!(activity.sessions[0].laps.len(), 1);
        assert_eq!(activity.sessions[0].laps[0].lengths.len(), 1);
        assert_eq!(activity.sessions[0].laps[0].lengths[0].records.len(), 1);
    }
}
