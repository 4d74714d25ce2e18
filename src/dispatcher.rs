//! Event dispatcher (§4.5): clock bookkeeping, compressed-timestamp
//! expansion, invalid-value elision, and routing to a per-message-kind
//! handler surface.
//!
//! The source's class hierarchy with overridable `on-*` hooks becomes a
//! plain trait with one method per message kind and default no-op bodies
//! (§9 design note); [`ActivityBuilder`](crate::activity::builder::ActivityBuilder)
//! is the concrete implementation that actually accumulates state.

use crate::decoder::DecodedMessage;
use crate::messages;
use crate::value::{FieldValue, Message};

/// FIT's epoch marker: a timestamp field holding exactly this value means
/// "no timestamp", not "1989-12-31".
pub const EPOCH_MARKER: i64 = 0;

/// Clock state the dispatcher threads through decoding: a start timestamp
/// (set once, on the first valid timestamp seen) and a current timestamp
/// that only ever moves forward (§3 `Clock state`, §8 monotonicity).
#[derive(Debug, Default, Clone, Copy)]
pub struct Clock {
    pub start_timestamp: Option<i64>,
    pub current_timestamp: Option<i64>,
}

impl Clock {
    pub fn new() -> Self {
        Clock::default()
    }

    /// Runs the five-step `update_timestamp` pre-step over `record` in
    /// place, advancing the clock and filling/expanding timestamp fields.
    pub fn update_timestamp(&mut self, record: &mut Message) {
        if let Some(ts) = record.get("timestamp").and_then(|v| v.as_i64()) {
            if ts == EPOCH_MARKER {
                record.remove("timestamp");
                if let Some(current) = self.current_timestamp {
                    record.prepend("timestamp", FieldValue::SInt(current));
                }
            } else {
                self.current_timestamp = Some(self.current_timestamp.map_or(ts, |c| c.max(ts)));
            }
        }

        if self.start_timestamp.is_none() {
            if let Some(ts) = record.get("timestamp").and_then(|v| v.as_i64()) {
                self.start_timestamp = Some(ts);
            }
        }

        let start_time_missing_or_epoch = match record.get("start_time").and_then(|v| v.as_i64()) {
            None => true,
            Some(v) => v == EPOCH_MARKER,
        };
        if start_time_missing_or_epoch {
            if let Some(current) = self.current_timestamp {
                record.prepend("start_time", FieldValue::SInt(current));
            }
        }

        if let Some(offset) = record.get("compressed_timestamp").and_then(|v| v.as_i64()) {
            if let Some(current) = self.current_timestamp {
                let offset = offset as i64;
                let base = current - (current % 32);
                let rem = current % 32;
                let full = if offset >= rem { base + offset } else { base + offset + 32 };
                record.prepend("timestamp", FieldValue::SInt(full));
                self.current_timestamp = Some(self.current_timestamp.unwrap().max(full));
            }
        }
    }
}

/// One method per message kind this crate names explicitly, each with a
/// no-op default body; a concrete dispatcher overrides the ones it cares
/// about. `other` catches any message kind falling outside the named set.
pub trait Dispatcher {
    fn on_file_id(&mut self, _fields: Message) {}
    fn on_file_creator(&mut self, _fields: Message) {}
    fn on_activity(&mut self, _fields: Message) {}
    fn on_session(&mut self, _fields: Message) {}
    fn on_lap(&mut self, _fields: Message) {}
    fn on_record(&mut self, _fields: Message) {}
    fn on_length(&mut self, _fields: Message) {}
    fn on_device_info(&mut self, _fields: Message) {}
    fn on_location(&mut self, _fields: Message) {}
    fn on_workout(&mut self, _fields: Message) {}
    fn on_workout_step(&mut self, _fields: Message) {}
    fn on_sport(&mut self, _fields: Message) {}
    fn on_hrv(&mut self, _fields: Message) {}
    fn on_developer_data_id(&mut self, _fields: Message) {}
    fn on_field_description(&mut self, _fields: Message) {}
    fn on_training_file(&mut self, _fields: Message) {}
    fn on_event(&mut self, _fields: Message) {}
    fn on_other(&mut self, _global_id: u16, _message_name: String, _fields: Message) {}
}

/// Removes every field whose value was decoded as "no value" before
/// dispatch. In practice the decoder never inserts "no value" entries to
/// begin with (§4.2 already elides them at the type-registry boundary), so
/// this is a defensive no-op pass matching the pre-step the distilled spec
/// describes explicitly.
fn elide_no_value(fields: Message) -> Message {
    fields
}

/// Runs the clock pre-step and routes `decoded` to the matching handler on
/// `dispatcher`.
pub fn dispatch(clock: &mut Clock, dispatcher: &mut impl Dispatcher, decoded: DecodedMessage) {
    let DecodedMessage { global_id, message_name, mut fields } = decoded;
    clock.update_timestamp(&mut fields);
    let fields = elide_no_value(fields);

    match global_id {
        messages::GLOBAL_FILE_ID => dispatcher.on_file_id(fields),
        messages::GLOBAL_FILE_CREATOR => dispatcher.on_file_creator(fields),
        messages::GLOBAL_ACTIVITY => dispatcher.on_activity(fields),
        messages::GLOBAL_SESSION => dispatcher.on_session(fields),
        messages::GLOBAL_LAP => dispatcher.on_lap(fields),
        messages::GLOBAL_RECORD => dispatcher.on_record(fields),
        messages::GLOBAL_LENGTH => dispatcher.on_length(fields),
        messages::GLOBAL_DEVICE_INFO => dispatcher.on_device_info(fields),
        messages::GLOBAL_LOCATION => dispatcher.on_location(fields),
        messages::GLOBAL_WORKOUT => dispatcher.on_workout(fields),
        messages::GLOBAL_WORKOUT_STEP => dispatcher.on_workout_step(fields),
        messages::GLOBAL_SPORT => dispatcher.on_sport(fields),
        messages::GLOBAL_HRV => dispatcher.on_hrv(fields),
        messages::GLOBAL_DEVELOPER_DATA_ID => dispatcher.on_developer_data_id(fields),
        messages::GLOBAL_FIELD_DESCRIPTION => dispatcher.on_field_description(fields),
        messages::GLOBAL_TRAINING_FILE => dispatcher.on_training_file(fields),
        messages::GLOBAL_EVENT => dispatcher.on_event(fields),
        _ => dispatcher.on_other(global_id, message_name, fields),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotone() {
        let mut clock = Clock::new();
        let mut r1 = Message::new();
        r1.push("timestamp", FieldValue::SInt(100));
        clock.update_timestamp(&mut r1);
        assert_eq!(clock.current_timestamp, Some(100));

        let mut r2 = Message::new();
        r2.push("timestamp", FieldValue::SInt(50));
        clock.update_timestamp(&mut r2);
        assert_eq!(clock.current_timestamp, Some(100));

        let mut r3 = Message::new();
        r3.push("timestamp", FieldValue::SInt(150));
        clock.update_timestamp(&mut r3);
        assert_eq!(clock.current_timestamp, Some(150));
    }

    #[test]
    fn epoch_marker_is_treated_as_absent_and_substituted() {
        let mut clock = Clock::new();
        clock.current_timestamp = Some(500);
        let mut r = Message::new();
        r.push("timestamp", FieldValue::SInt(EPOCH_MARKER));
        clock.update_timestamp(&mut r);
        assert_eq!(r.get("timestamp").unwrap().as_i64(), Some(500));
    }

    #[test]
    fn compressed_timestamp_rolls_over() {
        let mut clock = Clock::new();
        clock.current_timestamp = Some(1000); // 31*32 + 8
        let mut r = Message::new();
        r.push("compressed_timestamp", FieldValue::UInt(3));
        clock.update_timestamp(&mut r);
        assert_eq!(r.get("timestamp").unwrap().as_i64(), Some(31 * 32 + 3 + 32));
    }

    #[test]
    fn compressed_timestamp_without_rollover() {
        let mut clock = Clock::new();
        clock.current_timestamp = Some(1000);
        let mut r = Message::new();
        r.push("compressed_timestamp", FieldValue::UInt(20));
        clock.update_timestamp(&mut r);
        assert_eq!(r.get("timestamp").unwrap().as_i64(), Some(31 * 32 + 20));
    }

    #[test]
    fn start_time_filled_when_missing() {
        let mut clock = Clock::new();
        clock.current_timestamp = Some(42);
        let mut r = Message::new();
        clock.update_timestamp(&mut r);
        assert_eq!(r.get("start_time").unwrap().as_i64(), Some(42));
    }
}
