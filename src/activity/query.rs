//! Bulk, read-only convenience accessors over an assembled [`Activity`].
//!
//! Grounded on `FitFile::filter`/`index_filter`/`group` in `structs.rs`:
//! bulk predicate filtering and aggregation over an already-parsed record set
//! reaches for `rayon`'s parallel iterators there, while anything that needs
//! strict ordering (the decode loop, the dispatcher's clock) stays
//! sequential. `group` itself falls back to a plain sequential `iter()`
//! where the closure needs to borrow a shared `HashMap<_, _>` mutably —
//! `rayon::prelude::ParallelIterator` doesn't support that without a lock,
//! so `flatten_records` does the same.

use rayon::prelude::*;

use crate::activity::model::{Activity, TrackRecord};

impl Activity {
    /// Every trackpoint reachable from every session, in whatever order the
    /// session/lap/length nesting holds them (not necessarily chronological
    /// across lengths, since length-to-lap pairing can reorder by case 4 of
    /// the lap-attachment logic). Used as the basis for the predicate/sum
    /// helpers below.
    pub fn flatten_records(&self) -> Vec<&TrackRecord> {
        self.sessions
            .par_iter()
            .flat_map_iter(|session| session.laps.iter().flat_map(|lap| lap.lengths.iter().flat_map(|length| length.records.iter())))
            .collect()
    }

    /// Every trackpoint carrying a field named `field_name`, filtered in
    /// parallel over the flattened record set (mirrors `FitFile::filter`,
    /// but predicated on field presence rather than a FIT global message id
    /// since this crate's records are already message-homogeneous by the
    /// time they reach `Activity`).
    pub fn records_with_field(&self, field_name: &str) -> Vec<&TrackRecord> {
        self.flatten_records().into_par_iter().filter(|r| r.fields.contains(field_name)).collect()
    }

    /// Sums `field_name` as `f64` across every record that carries it,
    /// skipping records where it is absent or non-numeric. `None` if no
    /// record carries the field at all.
    pub fn sum_field(&self, field_name: &str) -> Option<f64> {
        let values: Vec<f64> =
            self.flatten_records().into_par_iter().filter_map(|r| r.fields.get(field_name).and_then(|v| v.as_f64())).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.par_iter().sum())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::activity::model::{Activity, Lap, Length, Session, TrackRecord};
    use crate::value::{FieldValue, Message};

    fn activity_with_heart_rates(values: &[i64]) -> Activity {
        let records = values
            .iter()
            .map(|hr| {
                let mut fields = Message::new();
                fields.push("heart_rate", FieldValue::SInt(*hr));
                TrackRecord { fields }
            })
            .collect();
        let length = Length { fields: Message::new(), records };
        let lap = Lap { fields: Message::new(), lengths: vec![length] };
        let session = Session { fields: Message::new(), devices: Vec::new(), laps: vec![lap] };
        Activity { sessions: vec![session], ..Default::default() }
    }

    #[test]
    fn flatten_records_walks_the_whole_hierarchy() {
        let activity = activity_with_heart_rates(&[100, 110, 120]);
        assert_eq!(activity.flatten_records().len(), 3);
    }

    #[test]
    fn records_with_field_filters_by_presence() {
        let activity = activity_with_heart_rates(&[100, 110]);
        assert_eq!(activity.records_with_field("heart_rate").len(), 2);
        assert!(activity.records_with_field("cadence").is_empty());
    }

    #[test]
    fn sum_field_adds_across_every_record() {
        let activity = activity_with_heart_rates(&[100, 110, 120]);
        assert_eq!(activity.sum_field("heart_rate"), Some(330.0));
        assert_eq!(activity.sum_field("cadence"), None);
    }
}
