//! Sport file writer (§4.7, file-type 3): zones-target, sport/sub-sport, and
//! optional heart-rate/power/speed zone lists, each zone carrying its own
//! auto-incrementing `message_index`.

use crate::basetype::{UINT16, UINT8};
use crate::errors::WriteError;
use crate::messages::GLOBAL_SPORT;
use crate::value::{FieldValue, Message};
use crate::writer::core::{FieldSpec, WriterCore};
use crate::writer::{file_id, file_type};

const GLOBAL_ZONES_TARGET: u16 = 7;
const GLOBAL_HR_ZONE: u16 = 8;
const GLOBAL_POWER_ZONE: u16 = 9;
const GLOBAL_SPEED_ZONE: u16 = 53;

const ZONES_TARGET_LOCAL_ID: u8 = 1;
const SPORT_LOCAL_ID: u8 = 2;
const HR_ZONE_LOCAL_ID: u8 = 3;
const POWER_ZONE_LOCAL_ID: u8 = 4;
const SPEED_ZONE_LOCAL_ID: u8 = 5;

/// Converts a speed zone boundary from m/s to the mm/s integer the wire
/// format stores (§4.7: "multiplied by 1000 before rounding to integer").
fn speed_to_millimeters_per_second(meters_per_second: f64) -> u32 {
    (meters_per_second * 1000.0).round() as u32
}

pub struct SportWriter {
    core: WriterCore,
    sport: u8,
    sub_sport: u8,
    max_heart_rate: Option<u8>,
    threshold_power: Option<u16>,
    calculation_type: Option<u8>,
    hr_zones: Vec<u8>,
    power_zones: Vec<u16>,
    speed_zones: Vec<f64>,
}

impl SportWriter {
    pub fn new(time_created: i64, sport: u8, sub_sport: u8) -> Result<Self, WriteError> {
        let mut core = WriterCore::new();
        file_id::write_preamble(&mut core, file_type::SPORT, time_created)?;
        Ok(SportWriter {
            core,
            sport,
            sub_sport,
            max_heart_rate: None,
            threshold_power: None,
            calculation_type: None,
            hr_zones: Vec::new(),
            power_zones: Vec::new(),
            speed_zones: Vec::new(),
        })
    }

    pub fn set_zones_target(&mut self, max_heart_rate: u8, threshold_power: u16, calculation_type: u8) {
        self.max_heart_rate = Some(max_heart_rate);
        self.threshold_power = Some(threshold_power);
        self.calculation_type = Some(calculation_type);
    }

    pub fn push_hr_zone(&mut self, high_bpm: u8) -> u16 {
        self.hr_zones.push(high_bpm);
        (self.hr_zones.len() - 1) as u16
    }

    pub fn push_power_zone(&mut self, high_watts: u16) -> u16 {
        self.power_zones.push(high_watts);
        (self.power_zones.len() - 1) as u16
    }

    pub fn push_speed_zone(&mut self, high_meters_per_second: f64) -> u16 {
        self.speed_zones.push(high_meters_per_second);
        (self.speed_zones.len() - 1) as u16
    }

    pub fn finalise(mut self) -> Result<Vec<u8>, WriteError> {
        if self.max_heart_rate.is_some() {
            self.core.put_definition(
                GLOBAL_ZONES_TARGET,
                ZONES_TARGET_LOCAL_ID,
                vec![
                    FieldSpec::scalar(1, "max_heart_rate", UINT8),
                    FieldSpec::scalar(2, "threshold_power", UINT16),
                    FieldSpec::scalar(5, "calculation_type", UINT8),
                ],
            )?;
            let mut zones = Message::new();
            zones.push("max_heart_rate", FieldValue::UInt(self.max_heart_rate.unwrap() as u64));
            zones.push("threshold_power", FieldValue::UInt(self.threshold_power.unwrap_or(0) as u64));
            zones.push("calculation_type", FieldValue::UInt(self.calculation_type.unwrap_or(0) as u64));
            self.core.put_message(GLOBAL_ZONES_TARGET, &zones)?;
        }

        self.core.put_definition(
            GLOBAL_SPORT,
            SPORT_LOCAL_ID,
            vec![FieldSpec::scalar(0, "sport", UINT8), FieldSpec::scalar(1, "sub_sport", UINT8)],
        )?;
        let mut sport = Message::new();
        sport.push("sport", FieldValue::UInt(self.sport as u64));
        sport.push("sub_sport", FieldValue::UInt(self.sub_sport as u64));
        self.core.put_message(GLOBAL_SPORT, &sport)?;

        if !self.hr_zones.is_empty() {
            self.core.put_definition(
                GLOBAL_HR_ZONE,
                HR_ZONE_LOCAL_ID,
                vec![FieldSpec::scalar(254, "message_index", UINT16), FieldSpec::scalar(1, "high_bpm", UINT8)],
            )?;
            for (index, high_bpm) in self.hr_zones.iter().enumerate() {
                let mut data = Message::new();
                data.push("message_index", FieldValue::UInt(index as u64));
                data.push("high_bpm", FieldValue::UInt(*high_bpm as u64));
                self.core.put_message(GLOBAL_HR_ZONE, &data)?;
            }
        }

        if !self.power_zones.is_empty() {
            self.core.put_definition(
                GLOBAL_POWER_ZONE,
                POWER_ZONE_LOCAL_ID,
                vec![FieldSpec::scalar(254, "message_index", UINT16), FieldSpec::scalar(1, "high_value", UINT16)],
            )?;
            for (index, high_value) in self.power_zones.iter().enumerate() {
                let mut data = Message::new();
                data.push("message_index", FieldValue::UInt(index as u64));
                data.push("high_value", FieldValue::UInt(*high_value as u64));
                self.core.put_message(GLOBAL_POWER_ZONE, &data)?;
            }
        }

        if !self.speed_zones.is_empty() {
            self.core.put_definition(
                GLOBAL_SPEED_ZONE,
                SPEED_ZONE_LOCAL_ID,
                vec![FieldSpec::scalar(254, "message_index", UINT16), FieldSpec::scalar(1, "high_value", UINT16)],
            )?;
            for (index, high_mps) in self.speed_zones.iter().enumerate() {
                let mut data = Message::new();
                data.push("message_index", FieldValue::UInt(index as u64));
                data.push("high_value", FieldValue::UInt(speed_to_millimeters_per_second(*high_mps) as u64));
                self.core.put_message(GLOBAL_SPEED_ZONE, &data)?;
            }
        }

        self.core.finalise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compute_crc;

    #[test]
    fn speed_zone_converts_to_millimeters_per_second() {
        assert_eq!(speed_to_millimeters_per_second(2.5), 2500);
    }

    #[test]
    fn full_sport_file_has_valid_crc() {
        let mut writer = SportWriter::new(1_000_000_000, 1, 0).unwrap();
        writer.set_zones_target(180, 250, 1);
        writer.push_hr_zone(120);
        writer.push_speed_zone(3.0);
        let buf = writer.finalise().unwrap();
        assert_eq!(compute_crc(&buf), 0);
    }
}
