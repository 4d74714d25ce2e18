//! The `compute_summary` external collaborator (§6) and a default
//! implementation good enough to use out of the box.
//!
//! The distilled spec treats `compute_summary` as a pure contract the
//! embedding application supplies (it rolls sensor samples into session/lap
//! aggregates using domain knowledge this crate doesn't have — unit
//! conversions, vendor-specific quirks). A crate with no built-in
//! implementation of its own primary collaborator would be unusable without
//! the caller writing one from scratch first, so `BasicSummary` computes the
//! handful of aggregates that don't need any domain table: elapsed time,
//! average/max heart rate, and total distance.

use crate::activity::model::{timestamp_of, Lap, Length, Session, TrackRecord};
use crate::value::{FieldValue, Message};

/// Rolls the records/lengths/laps/sessions accumulated for a synthesized
/// terminal lap or session into a summary `Message` that gets prepended
/// ahead of the synthesized container's own fields (§4.6 `collect_activity`
/// steps 2 and 5).
pub trait SummaryComputer {
    fn compute_summary(&self, records: &[TrackRecord], lengths: &[Length], laps: &[Lap], sessions: &[Session]) -> Message;
}

/// A default `SummaryComputer` covering the aggregates derivable without any
/// domain-specific unit table: elapsed time (max timestamp − min timestamp
/// across every record reachable from `records`/`lengths`/`laps`), average
/// and maximum heart rate, and total distance (taken from the last record
/// with a `distance` field, FIT's own distance field already being a running
/// total rather than a per-sample delta).
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicSummary;

impl BasicSummary {
    fn all_records<'a>(records: &'a [TrackRecord], lengths: &'a [Length], laps: &'a [Lap]) -> Vec<&'a TrackRecord> {
        let mut out: Vec<&TrackRecord> = records.iter().collect();
        for length in lengths {
            out.extend(length.records.iter());
        }
        for lap in laps {
            for length in &lap.lengths {
                out.extend(length.records.iter());
            }
        }
        out
    }
}

impl SummaryComputer for BasicSummary {
    fn compute_summary(&self, records: &[TrackRecord], lengths: &[Length], laps: &[Lap], _sessions: &[Session]) -> Message {
        let all = Self::all_records(records, lengths, laps);

        let timestamps: Vec<i64> = all.iter().filter_map(|r| timestamp_of(&r.fields)).collect();
        let heart_rates: Vec<i64> = all.iter().filter_map(|r| r.fields.get("heart_rate").and_then(|v| v.as_i64())).collect();
        let last_distance = all.iter().rev().find_map(|r| r.fields.get("distance").and_then(|v| v.as_f64()));

        let mut summary = Message::new();
        if let (Some(&min), Some(&max)) = (timestamps.iter().min(), timestamps.iter().max()) {
            summary.push("total_elapsed_time", FieldValue::SInt(max - min));
        }
        if !heart_rates.is_empty() {
            let avg = heart_rates.iter().sum::<i64>() as f64 / heart_rates.len() as f64;
            let max = *heart_rates.iter().max().unwrap();
            summary.push("avg_heart_rate", FieldValue::Float(avg));
            summary.push("max_heart_rate", FieldValue::SInt(max));
        }
        if let Some(distance) = last_distance {
            summary.push("total_distance", FieldValue::Float(distance));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: i64, hr: Option<i64>) -> TrackRecord {
        let mut fields = Message::new();
        fields.push("timestamp", FieldValue::SInt(ts));
        if let Some(hr) = hr {
            fields.push("heart_rate", FieldValue::SInt(hr));
        }
        TrackRecord { fields }
    }

    #[test]
    fn computes_elapsed_time_and_heart_rate_aggregates() {
        let records = vec![record(100, Some(120)), record(110, Some(140)), record(120, Some(130))];
        let summary = BasicSummary.compute_summary(&records, &[], &[], &[]);
        assert_eq!(summary.get("total_elapsed_time").unwrap().as_i64(), Some(20));
        assert_eq!(summary.get("max_heart_rate").unwrap().as_i64(), Some(140));
        assert_eq!(summary.get("avg_heart_rate").unwrap().as_f64(), Some(130.0));
    }
}
