//! Settings file writer (§4.7, file-type 2): a user profile (gender, age,
//! height, weight, activity class, birth year) and an HRM profile
//! (log-HRV flag).

use chrono::{DateTime, Datelike, Utc};

use crate::basetype::{UINT16, UINT8};
use crate::errors::WriteError;
use crate::value::{FieldValue, Message};
use crate::writer::core::{FieldSpec, WriterCore};
use crate::writer::{file_id, file_type};

const GLOBAL_USER_PROFILE: u16 = 3;
const GLOBAL_HRM_PROFILE: u16 = 4;
const USER_PROFILE_LOCAL_ID: u8 = 1;
const HRM_PROFILE_LOCAL_ID: u8 = 2;

/// Seconds from the Unix epoch to the FIT epoch (1989-12-31T00:00:00Z).
const FIT_EPOCH_OFFSET_SECONDS: i64 = 631_065_600;
const SECONDS_PER_YEAR: i64 = 31_536_000;

fn fit_timestamp_to_utc(fit_seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(fit_seconds + FIT_EPOCH_OFFSET_SECONDS, 0)
}

pub struct SettingsWriter {
    core: WriterCore,
}

impl SettingsWriter {
    pub fn new(time_created: i64) -> Result<Self, WriteError> {
        let mut core = WriterCore::new();
        file_id::write_preamble(&mut core, file_type::SETTINGS, time_created)?;
        Ok(SettingsWriter { core })
    }

    /// `now` and `date_of_birth` are both FIT-epoch second counts. `height_m`
    /// and `weight_kg` are plain units; `activity_class` is the 0.0-10.0
    /// scale the FIT profile defines before ×10 scaling.
    pub fn set_user_profile(
        &mut self,
        gender: u8,
        date_of_birth: i64,
        height_m: f64,
        weight_kg: f64,
        activity_class: f64,
        now: i64,
    ) -> Result<(), WriteError> {
        self.core.put_definition(
            GLOBAL_USER_PROFILE,
            USER_PROFILE_LOCAL_ID,
            vec![
                FieldSpec::scalar(1, "gender", UINT8),
                FieldSpec::scalar(2, "age", UINT8),
                FieldSpec::scalar(3, "height", UINT8),
                FieldSpec::scalar(4, "weight", UINT16),
                FieldSpec::scalar(5, "activity_class", UINT8),
                FieldSpec::scalar(6, "birth_year", UINT8),
            ],
        )?;

        let age = ((now - date_of_birth).max(0) / SECONDS_PER_YEAR) as u64;
        let birth_year = fit_timestamp_to_utc(date_of_birth).map(|dt| dt.year() - 1900).unwrap_or(0).max(0) as u64;

        let mut profile = Message::new();
        profile.push("gender", FieldValue::UInt(gender as u64));
        profile.push("age", FieldValue::UInt(age));
        profile.push("height", FieldValue::UInt((height_m * 100.0).round() as u64));
        profile.push("weight", FieldValue::UInt((weight_kg * 10.0).round() as u64));
        profile.push("activity_class", FieldValue::UInt((activity_class * 10.0).round() as u64));
        profile.push("birth_year", FieldValue::UInt(birth_year));
        self.core.put_message(GLOBAL_USER_PROFILE, &profile)
    }

    pub fn set_hrm_profile(&mut self, log_hrv: bool) -> Result<(), WriteError> {
        self.core.put_definition(GLOBAL_HRM_PROFILE, HRM_PROFILE_LOCAL_ID, vec![FieldSpec::scalar(0, "log_hrv", UINT8)])?;
        let mut hrm = Message::new();
        hrm.push("log_hrv", FieldValue::UInt(log_hrv as u64));
        self.core.put_message(GLOBAL_HRM_PROFILE, &hrm)
    }

    pub fn finalise(self) -> Result<Vec<u8>, WriteError> {
        self.core.finalise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compute_crc;

    #[test]
    fn age_and_birth_year_derive_from_date_of_birth() {
        let mut writer = SettingsWriter::new(100_000).unwrap();
        // date_of_birth 10 years before `now`, both in FIT-epoch seconds.
        let now = 700_000_000i64;
        let dob = now - 10 * SECONDS_PER_YEAR;
        writer.set_user_profile(1, dob, 1.80, 75.0, 5.0, now).unwrap();
        writer.set_hrm_profile(true).unwrap();
        let buf = writer.finalise().unwrap();
        assert_eq!(compute_crc(&buf), 0);
    }
}
