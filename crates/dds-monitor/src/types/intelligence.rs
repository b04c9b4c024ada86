// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::topics::RecordKind;

flat_record! {
    /// Vehicle status, target detection and target assignment.
    ///
    /// `vs_task_status` and `td_target_type` carry enum wire values.
    #[allow(non_snake_case)]
    pub struct FlatIntelligence ("Intelligence::FlatIntelligence", RecordKind::Intelligence) {
        vs_task_status: u32,
        vs_battery_percentage: u16,
        vs_signal_strength_dbm: f32,
        vs_system_error: bool,
        td_target_ID: String,
        td_target_type: u32,
        td_location_latitude: f64,
        td_location_longitude: f64,
        td_location_altitude: f32,
        td_location_time_seconds: i32,
        td_location_time_nano_seconds: u32,
        td_location_speed_mps: f32,
        td_location_orientation_degrees: i16,
        td_confidence_level: f32,
        td_description: String,
        td_raw_data_link: String,
        ta_command: String,
        ta_location_latitude: f64,
        ta_location_longitude: f64,
        ta_location_altitude: f32,
        ta_location_time_seconds: i32,
        ta_location_time_nano_seconds: u32,
        ta_location_speed_mps: f32,
        ta_location_orientation_degrees: i16,
    }
}
