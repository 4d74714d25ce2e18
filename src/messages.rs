//! Static message/field name tables, compiled in as process-wide read-only
//! data.
//!
//! Grounded on the upstream `messages.rs` (`message_types::get_messagetype`,
//! `field_types::get_fieldtype`), which tabulates the full Profile.xlsx
//! surface the GeoELAN VIRB pipeline touches. This crate needs a narrower
//! slice, so the session/lap/record/event/device_info/field_description/
//! developer_data_id/activity/file_id/file_creator/gps_metadata field tables
//! are carried over near verbatim, and length/workout/workout_step/sport/
//! hrv/training_file (absent from the VIRB-oriented upstream table, since
//! VIRB doesn't emit them) are added from the same FIT SDK generation the
//! upstream table was itself transcribed from. Anything outside this set
//! falls back to a numeric name, matching the upstream
//! `UNDEFINED_MESSAGE_TYPE_{n}` / `UNDEFINED_FIELD_{n}` convention.

pub const GLOBAL_FILE_ID: u16 = 0;
pub const GLOBAL_SPORT: u16 = 12;
pub const GLOBAL_ZONES_TARGET: u16 = 7;
pub const GLOBAL_HR_ZONE: u16 = 8;
pub const GLOBAL_POWER_ZONE: u16 = 9;
pub const GLOBAL_SESSION: u16 = 18;
pub const GLOBAL_LAP: u16 = 19;
pub const GLOBAL_RECORD: u16 = 20;
pub const GLOBAL_EVENT: u16 = 21;
pub const GLOBAL_DEVICE_INFO: u16 = 23;
pub const GLOBAL_WORKOUT: u16 = 26;
pub const GLOBAL_WORKOUT_STEP: u16 = 27;
pub const GLOBAL_ACTIVITY: u16 = 34;
pub const GLOBAL_FILE_CREATOR: u16 = 49;
pub const GLOBAL_SPEED_ZONE: u16 = 53;
pub const GLOBAL_TRAINING_FILE: u16 = 72;
pub const GLOBAL_HRV: u16 = 78;
pub const GLOBAL_LENGTH: u16 = 101;
pub const GLOBAL_USER_PROFILE: u16 = 3;
pub const GLOBAL_HRM_PROFILE: u16 = 4;
pub const GLOBAL_LOCATION: u16 = 160; // gps_metadata
pub const GLOBAL_FIELD_DESCRIPTION: u16 = 206;
pub const GLOBAL_DEVELOPER_DATA_ID: u16 = 207;

/// Maps a global message number to its symbolic name, falling back to a
/// numeric placeholder for anything this crate doesn't name explicitly.
pub fn message_name(global_id: u16) -> String {
    match global_id {
        0 => "file_id".to_string(),
        3 => "user_profile".to_string(),
        4 => "hrm_profile".to_string(),
        7 => "zones_target".to_string(),
        8 => "hr_zone".to_string(),
        9 => "power_zone".to_string(),
        12 => "sport".to_string(),
        18 => "session".to_string(),
        19 => "lap".to_string(),
        20 => "record".to_string(),
        21 => "event".to_string(),
        23 => "device_info".to_string(),
        26 => "workout".to_string(),
        27 => "workout_step".to_string(),
        34 => "activity".to_string(),
        49 => "file_creator".to_string(),
        53 => "speed_zone".to_string(),
        72 => "training_file".to_string(),
        78 => "hrv".to_string(),
        101 => "length".to_string(),
        160 => "location".to_string(),
        206 => "field_description".to_string(),
        207 => "developer_data_id".to_string(),
        _ => format!("UNDEFINED_MESSAGE_TYPE_{global_id}"),
    }
}

/// Maps (global message number, field definition number) to its symbolic
/// field name, falling back to a numeric placeholder for unknown fields.
pub fn field_name(global_id: u16, field_definition_number: u8) -> String {
    match global_id {
        0 => file_id_field(field_definition_number),
        3 => user_profile_field(field_definition_number),
        4 => hrm_profile_field(field_definition_number),
        12 => sport_field(field_definition_number),
        18 => session_field(field_definition_number),
        19 => lap_field(field_definition_number),
        20 => record_field(field_definition_number),
        21 => event_field(field_definition_number),
        23 => device_info_field(field_definition_number),
        26 => workout_field(field_definition_number),
        27 => workout_step_field(field_definition_number),
        34 => activity_field(field_definition_number),
        49 => file_creator_field(field_definition_number),
        72 => training_file_field(field_definition_number),
        78 => hrv_field(field_definition_number),
        101 => length_field(field_definition_number),
        160 => location_field(field_definition_number),
        206 => field_description_field(field_definition_number),
        207 => developer_data_id_field(field_definition_number),
        _ => format!("UNDEFINED_FIELD_{field_definition_number}"),
    }
}

fn file_id_field(n: u8) -> String {
    match n {
        0 => "type".to_string(),
        1 => "manufacturer".to_string(),
        2 => "product".to_string(),
        3 => "serial_number".to_string(),
        4 => "time_created".to_string(),
        5 => "number".to_string(),
        8 => "product_name".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn file_creator_field(n: u8) -> String {
    match n {
        0 => "software_version".to_string(),
        1 => "hardware_version".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn user_profile_field(n: u8) -> String {
    match n {
        0 => "friendly_name".to_string(),
        1 => "gender".to_string(),
        2 => "age".to_string(),
        3 => "height".to_string(),
        4 => "weight".to_string(),
        5 => "language".to_string(),
        6 => "elev_setting".to_string(),
        7 => "weight_setting".to_string(),
        8 => "resting_heart_rate".to_string(),
        9 => "default_max_running_heart_rate".to_string(),
        10 => "default_max_biking_heart_rate".to_string(),
        11 => "default_max_heart_rate".to_string(),
        21 => "activity_class".to_string(),
        22 => "birth_year".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn hrm_profile_field(n: u8) -> String {
    match n {
        0 => "enabled".to_string(),
        1 => "hrm_ant_id".to_string(),
        2 => "log_hrv".to_string(),
        3 => "hrm_ant_id_trans_type".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn sport_field(n: u8) -> String {
    match n {
        0 => "sport".to_string(),
        1 => "sub_sport".to_string(),
        3 => "name".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn session_field(n: u8) -> String {
    match n {
        254 => "message_index".to_string(),
        253 => "timestamp".to_string(),
        0 => "event".to_string(),
        1 => "event_type".to_string(),
        2 => "start_time".to_string(),
        3 => "start_position_lat".to_string(),
        4 => "start_position_long".to_string(),
        5 => "sport".to_string(),
        6 => "sub_sport".to_string(),
        7 => "total_elapsed_time".to_string(),
        8 => "total_timer_time".to_string(),
        9 => "total_distance".to_string(),
        10 => "total_cycles".to_string(),
        11 => "total_calories".to_string(),
        13 => "total_fat_calories".to_string(),
        14 => "avg_speed".to_string(),
        15 => "max_speed".to_string(),
        16 => "avg_heart_rate".to_string(),
        17 => "max_heart_rate".to_string(),
        18 => "avg_cadence".to_string(),
        19 => "max_cadence".to_string(),
        20 => "avg_power".to_string(),
        21 => "max_power".to_string(),
        22 => "total_ascent".to_string(),
        23 => "total_descent".to_string(),
        24 => "total_training_effect".to_string(),
        25 => "first_lap_index".to_string(),
        26 => "num_laps".to_string(),
        27 => "event_group".to_string(),
        28 => "trigger".to_string(),
        29 => "nec_lat".to_string(),
        30 => "nec_long".to_string(),
        31 => "swc_lat".to_string(),
        32 => "swc_long".to_string(),
        34 => "normalized_power".to_string(),
        35 => "training_stress_score".to_string(),
        36 => "intensity_factor".to_string(),
        37 => "left_right_balance".to_string(),
        41 => "avg_stroke_count".to_string(),
        42 => "avg_stroke_distance".to_string(),
        43 => "swim_stroke".to_string(),
        44 => "pool_length".to_string(),
        45 => "threshold_power".to_string(),
        46 => "pool_length_unit".to_string(),
        47 => "num_active_lengths".to_string(),
        48 => "total_work".to_string(),
        49 => "avg_altitude".to_string(),
        50 => "max_altitude".to_string(),
        51 => "gps_accuracy".to_string(),
        59 => "total_moving_time".to_string(),
        64 => "min_heart_rate".to_string(),
        69 => "avg_lap_time".to_string(),
        70 => "best_lap_index".to_string(),
        71 => "min_altitude".to_string(),
        85 => "stroke_count".to_string(),
        86 => "zone_count".to_string(),
        92 => "avg_fractional_cadence".to_string(),
        93 => "max_fractional_cadence".to_string(),
        94 => "total_fractional_cycles".to_string(),
        111 => "sport_index".to_string(),
        116 => "avg_left_power_phase".to_string(),
        117 => "avg_left_power_phase_peak".to_string(),
        118 => "avg_right_power_phase".to_string(),
        119 => "avg_right_power_phase_peak".to_string(),
        133 => "avg_stance_time_balance".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn lap_field(n: u8) -> String {
    match n {
        254 => "message_index".to_string(),
        253 => "timestamp".to_string(),
        0 => "event".to_string(),
        1 => "event_type".to_string(),
        2 => "start_time".to_string(),
        3 => "start_position_lat".to_string(),
        4 => "start_position_long".to_string(),
        5 => "end_position_lat".to_string(),
        6 => "end_position_long".to_string(),
        7 => "total_elapsed_time".to_string(),
        8 => "total_timer_time".to_string(),
        9 => "total_distance".to_string(),
        10 => "total_cycles".to_string(),
        11 => "total_calories".to_string(),
        12 => "total_fat_calories".to_string(),
        13 => "avg_speed".to_string(),
        14 => "max_speed".to_string(),
        15 => "avg_heart_rate".to_string(),
        16 => "max_heart_rate".to_string(),
        17 => "avg_cadence".to_string(),
        18 => "max_cadence".to_string(),
        19 => "avg_power".to_string(),
        20 => "max_power".to_string(),
        21 => "total_ascent".to_string(),
        22 => "total_descent".to_string(),
        23 => "intensity".to_string(),
        24 => "lap_trigger".to_string(),
        25 => "sport".to_string(),
        26 => "event_group".to_string(),
        32 => "num_lengths".to_string(),
        33 => "normalized_power".to_string(),
        34 => "left_right_balance".to_string(),
        35 => "first_length_index".to_string(),
        37 => "avg_stroke_distance".to_string(),
        38 => "swim_stroke".to_string(),
        39 => "sub_sport".to_string(),
        40 => "num_active_lengths".to_string(),
        41 => "total_work".to_string(),
        42 => "avg_altitude".to_string(),
        43 => "max_altitude".to_string(),
        44 => "gps_accuracy".to_string(),
        52 => "total_moving_time".to_string(),
        63 => "min_heart_rate".to_string(),
        71 => "wkt_step_index".to_string(),
        75 => "stroke_count".to_string(),
        76 => "zone_count".to_string(),
        80 => "avg_fractional_cadence".to_string(),
        81 => "max_fractional_cadence".to_string(),
        82 => "total_fractional_cycles".to_string(),
        102 => "avg_left_power_phase".to_string(),
        103 => "avg_left_power_phase_peak".to_string(),
        104 => "avg_right_power_phase".to_string(),
        105 => "avg_right_power_phase_peak".to_string(),
        119 => "avg_stance_time_balance".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn record_field(n: u8) -> String {
    match n {
        253 => "timestamp".to_string(),
        0 => "position_lat".to_string(),
        1 => "position_long".to_string(),
        2 => "altitude".to_string(),
        3 => "heart_rate".to_string(),
        4 => "cadence".to_string(),
        5 => "distance".to_string(),
        6 => "speed".to_string(),
        7 => "power".to_string(),
        8 => "compressed_speed_distance".to_string(),
        9 => "grade".to_string(),
        10 => "resistance".to_string(),
        11 => "time_from_course".to_string(),
        12 => "cycle_length".to_string(),
        13 => "temperature".to_string(),
        18 => "cycles".to_string(),
        19 => "total_cycles".to_string(),
        28 => "compressed_accumulated_power".to_string(),
        29 => "accumulated_power".to_string(),
        30 => "left_right_balance".to_string(),
        31 => "gps_accuracy".to_string(),
        32 => "vertical_speed".to_string(),
        33 => "calories".to_string(),
        39 => "vertical_oscillation".to_string(),
        40 => "stance_time_percent".to_string(),
        41 => "stance_time".to_string(),
        42 => "activity_type".to_string(),
        43 => "left_torque_effectiveness".to_string(),
        44 => "right_torque_effectiveness".to_string(),
        45 => "left_pedal_smoothness".to_string(),
        46 => "right_pedal_smoothness".to_string(),
        47 => "combined_pedal_smoothness".to_string(),
        48 => "time128".to_string(),
        49 => "stroke_type".to_string(),
        50 => "zone".to_string(),
        52 => "cadence256".to_string(),
        53 => "fractional_cadence".to_string(),
        62 => "device_index".to_string(),
        67 => "left_pco".to_string(),
        68 => "right_pco".to_string(),
        69 => "left_power_phase".to_string(),
        70 => "left_power_phase_peak".to_string(),
        71 => "right_power_phase".to_string(),
        72 => "right_power_phase_peak".to_string(),
        73 => "enhanced_speed".to_string(),
        78 => "enhanced_altitude".to_string(),
        83 => "vertical_ratio".to_string(),
        84 => "stance_time_balance".to_string(),
        85 => "step_length".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn event_field(n: u8) -> String {
    match n {
        253 => "timestamp".to_string(),
        0 => "event".to_string(),
        1 => "event_type".to_string(),
        2 => "data16".to_string(),
        3 => "data".to_string(),
        4 => "event_group".to_string(),
        7 => "score".to_string(),
        8 => "opponent_score".to_string(),
        9 => "front_gear_num".to_string(),
        10 => "front_gear".to_string(),
        11 => "rear_gear_num".to_string(),
        12 => "rear_gear".to_string(),
        13 => "device_index".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn device_info_field(n: u8) -> String {
    match n {
        253 => "timestamp".to_string(),
        0 => "device_index".to_string(),
        1 => "device_type".to_string(),
        2 => "manufacturer".to_string(),
        3 => "serial_number".to_string(),
        4 => "product".to_string(),
        5 => "software_version".to_string(),
        6 => "hardware_version".to_string(),
        7 => "cum_operating_time".to_string(),
        10 => "battery_voltage".to_string(),
        11 => "battery_status".to_string(),
        18 => "sensor_position".to_string(),
        19 => "descriptor".to_string(),
        20 => "ant_transmission_type".to_string(),
        21 => "ant_device_number".to_string(),
        22 => "ant_network".to_string(),
        25 => "source_type".to_string(),
        27 => "product_name".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn workout_field(n: u8) -> String {
    match n {
        4 => "sport".to_string(),
        5 => "capabilities".to_string(),
        6 => "num_valid_steps".to_string(),
        8 => "wkt_name".to_string(),
        11 => "sub_sport".to_string(),
        14 => "pool_length".to_string(),
        15 => "pool_length_unit".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn workout_step_field(n: u8) -> String {
    match n {
        254 => "message_index".to_string(),
        0 => "wkt_step_name".to_string(),
        1 => "duration_type".to_string(),
        2 => "duration_value".to_string(),
        3 => "target_type".to_string(),
        4 => "target_value".to_string(),
        5 => "custom_target_value_low".to_string(),
        6 => "custom_target_value_high".to_string(),
        7 => "intensity".to_string(),
        8 => "notes".to_string(),
        9 => "equipment".to_string(),
        19 => "secondary_target_type".to_string(),
        20 => "secondary_target_value".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn activity_field(n: u8) -> String {
    match n {
        253 => "timestamp".to_string(),
        0 => "total_timer_time".to_string(),
        1 => "num_sessions".to_string(),
        2 => "type".to_string(),
        3 => "event".to_string(),
        4 => "event_type".to_string(),
        5 => "local_timestamp".to_string(),
        6 => "event_group".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn training_file_field(n: u8) -> String {
    match n {
        253 => "timestamp".to_string(),
        0 => "type".to_string(),
        1 => "manufacturer".to_string(),
        2 => "product".to_string(),
        3 => "serial_number".to_string(),
        4 => "time_created".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn hrv_field(n: u8) -> String {
    match n {
        0 => "time".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn length_field(n: u8) -> String {
    match n {
        254 => "message_index".to_string(),
        253 => "timestamp".to_string(),
        0 => "event".to_string(),
        1 => "event_type".to_string(),
        2 => "start_time".to_string(),
        3 => "total_elapsed_time".to_string(),
        4 => "total_timer_time".to_string(),
        5 => "total_strokes".to_string(),
        6 => "avg_speed".to_string(),
        7 => "swim_stroke".to_string(),
        9 => "avg_swimming_cadence".to_string(),
        10 => "event_group".to_string(),
        11 => "total_calories".to_string(),
        12 => "length_type".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn location_field(n: u8) -> String {
    match n {
        253 => "timestamp".to_string(),
        0 => "timestamp_ms".to_string(),
        1 => "position_lat".to_string(),
        2 => "position_long".to_string(),
        3 => "enhanced_altitude".to_string(),
        4 => "enhanced_speed".to_string(),
        5 => "heading".to_string(),
        6 => "utc_timestamp".to_string(),
        7 => "velocity".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn field_description_field(n: u8) -> String {
    match n {
        0 => "developer_data_index".to_string(),
        1 => "field_definition_number".to_string(),
        2 => "fit_base_type_id".to_string(),
        3 => "field_name".to_string(),
        4 => "array".to_string(),
        5 => "components".to_string(),
        6 => "scale".to_string(),
        7 => "offset".to_string(),
        8 => "units".to_string(),
        9 => "bits".to_string(),
        10 => "accumulate".to_string(),
        13 => "fit_base_unit_id".to_string(),
        14 => "native_mesg_num".to_string(),
        15 => "native_field_num".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

fn developer_data_id_field(n: u8) -> String {
    match n {
        0 => "developer_id".to_string(),
        1 => "application_id".to_string(),
        2 => "manufacturer_id".to_string(),
        3 => "developer_data_index".to_string(),
        4 => "application_version".to_string(),
        _ => format!("UNDEFINED_FIELD_{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_messages_resolve() {
        assert_eq!(message_name(20), "record");
        assert_eq!(message_name(101), "length");
    }

    #[test]
    fn unknown_message_falls_back_numerically() {
        assert_eq!(message_name(9999), "UNDEFINED_MESSAGE_TYPE_9999");
    }

    #[test]
    fn known_fields_resolve() {
        assert_eq!(field_name(20, 3), "heart_rate");
        assert_eq!(field_name(19, 254), "message_index");
    }

    #[test]
    fn unknown_field_falls_back_numerically() {
        assert_eq!(field_name(20, 250), "UNDEFINED_FIELD_250");
    }
}
