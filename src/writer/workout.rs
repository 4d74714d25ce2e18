//! Workout file writer (§4.7, file-type 5): workout name, sport, and a
//! mutable list of steps with auto-incrementing `message_index`. `finalise`
//! emits the `workout` definition+data followed by one `workout_step`
//! definition+data pair per step, in insertion order.

use crate::basetype::{STRING, UINT16, UINT32, UINT8};
use crate::errors::WriteError;
use crate::messages::{GLOBAL_WORKOUT, GLOBAL_WORKOUT_STEP};
use crate::value::{FieldValue, Message};
use crate::writer::core::{FieldSpec, WriterCore};
use crate::writer::{file_id, file_type};

const WORKOUT_LOCAL_ID: u8 = 1;
const STEP_LOCAL_ID: u8 = 2;
const NAME_FIELD_WIDTH: u8 = 32;

/// One workout step: a duration condition, a target condition, and an
/// intensity class. `message_index` is assigned by [`WorkoutWriter::add_step`].
#[derive(Debug, Clone, Default)]
pub struct WorkoutStep {
    pub name: Option<String>,
    pub duration_type: u8,
    pub duration_value: u32,
    pub target_type: u8,
    pub target_value: u32,
    pub intensity: u8,
}

pub struct WorkoutWriter {
    core: WriterCore,
    name: Option<String>,
    sport: u8,
    steps: Vec<WorkoutStep>,
}

impl WorkoutWriter {
    pub fn new(time_created: i64, sport: u8) -> Result<Self, WriteError> {
        let mut core = WriterCore::new();
        file_id::write_preamble(&mut core, file_type::WORKOUT, time_created)?;
        Ok(WorkoutWriter { core, name: None, sport, steps: Vec::new() })
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Appends a step, assigning it the next `message_index` (0-based,
    /// insertion order).
    pub fn add_step(&mut self, step: WorkoutStep) -> u16 {
        let index = self.steps.len() as u16;
        self.steps.push(step);
        index
    }

    pub fn finalise(mut self) -> Result<Vec<u8>, WriteError> {
        self.core.put_definition(
            GLOBAL_WORKOUT,
            WORKOUT_LOCAL_ID,
            vec![
                FieldSpec::scalar(4, "sport", UINT8),
                FieldSpec::scalar(6, "num_valid_steps", UINT16),
                FieldSpec { field_number: 8, name: "wkt_name".into(), fit_type: STRING, count: NAME_FIELD_WIDTH },
            ],
        )?;
        let mut workout = Message::new();
        workout.push("sport", FieldValue::UInt(self.sport as u64));
        workout.push("num_valid_steps", FieldValue::UInt(self.steps.len() as u64));
        if let Some(name) = &self.name {
            workout.push("wkt_name", FieldValue::Text(name.clone()));
        }
        self.core.put_message(GLOBAL_WORKOUT, &workout)?;

        self.core.put_definition(
            GLOBAL_WORKOUT_STEP,
            STEP_LOCAL_ID,
            vec![
                FieldSpec::scalar(254, "message_index", UINT16),
                FieldSpec::scalar(1, "duration_type", UINT8),
                FieldSpec::scalar(2, "duration_value", UINT32),
                FieldSpec::scalar(4, "target_type", UINT8),
                FieldSpec::scalar(5, "target_value", UINT32),
                FieldSpec::scalar(6, "intensity", UINT8),
            ],
        )?;
        for (index, step) in self.steps.iter().enumerate() {
            let mut data = Message::new();
            data.push("message_index", FieldValue::UInt(index as u64));
            data.push("duration_type", FieldValue::UInt(step.duration_type as u64));
            data.push("duration_value", FieldValue::UInt(step.duration_value as u64));
            data.push("target_type", FieldValue::UInt(step.target_type as u64));
            data.push("target_value", FieldValue::UInt(step.target_value as u64));
            data.push("intensity", FieldValue::UInt(step.intensity as u64));
            self.core.put_message(GLOBAL_WORKOUT_STEP, &data)?;
        }
        self.core.finalise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compute_crc;
    use crate::decoder::{DecodeEvent, RecordDecoder};
    use crate::dispatcher::{Clock, Dispatcher};
    use crate::header::StreamReader;
    use crate::writer::file_id as file_id_mod;

    #[test]
    fn steps_get_sequential_message_indices() {
        let mut writer = WorkoutWriter::new(1_000_000_000, 1).unwrap();
        writer.set_name("Interval Set");
        let a = writer.add_step(WorkoutStep { duration_type: 1, duration_value: 60, ..Default::default() });
        let b = writer.add_step(WorkoutStep { duration_type: 1, duration_value: 120, ..Default::default() });
        assert_eq!((a, b), (0, 1));

        let buf = writer.finalise().unwrap();
        assert_eq!(compute_crc(&buf), 0);
    }

    #[derive(Default)]
    struct Capture {
        file_id: Option<Message>,
        workout: Option<Message>,
    }

    impl Dispatcher for Capture {
        fn on_file_id(&mut self, fields: Message) {
            self.file_id = Some(fields);
        }
        fn on_workout(&mut self, fields: Message) {
            self.workout = Some(fields);
        }
    }

    /// §8 scenario 2: a no-step workout named "Test" round-trips to a
    /// `file_id` of type workout-file (5) with the writer's own
    /// manufacturer/product identity, and a `workout` of the same name with
    /// `num_valid_steps = 0`.
    #[test]
    fn round_trips_a_named_workout_with_no_steps() {
        let mut writer = WorkoutWriter::new(1_000_000_000, 1).unwrap();
        writer.set_name("Test");
        let buf = writer.finalise().unwrap();

        let mut reader = StreamReader::new(buf).unwrap();
        let mut decoder = RecordDecoder::new();
        let mut clock = Clock::new();
        let mut capture = Capture::default();
        while !reader.is_eof() {
            if let DecodeEvent::Data(decoded) = decoder.next(&mut reader).unwrap() {
                crate::dispatcher::dispatch(&mut clock, &mut capture, decoded);
            }
        }

        let file_id = capture.file_id.unwrap();
        assert_eq!(file_id.get("type").unwrap().as_i64(), Some(file_type::WORKOUT as i64));
        assert_eq!(file_id.get("manufacturer").unwrap().as_i64(), Some(file_id_mod::DEVELOPMENT_MANUFACTURER as i64));
        assert_eq!(file_id.get("product").unwrap().as_i64(), Some(file_id_mod::DEVELOPMENT_PRODUCT as i64));

        let workout = capture.workout.unwrap();
        assert_eq!(workout.get("wkt_name").unwrap().as_str(), Some("Test"));
        assert_eq!(workout.get("sport").unwrap().as_i64(), Some(1));
        assert_eq!(workout.get("num_valid_steps").unwrap().as_i64(), Some(0));
    }
}
