// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::topics::RecordKind;

flat_record! {
    /// Messaging packet: sender status report, contact detection and task
    /// command, flattened into one record.
    #[allow(non_snake_case)]
    pub struct FlatMessagingPacket ("Messaging::FlatMessagingPacket", RecordKind::Messaging) {
        /// Enum wire value.
        message_type: u32,

        sr_header_sender_id: String,
        sr_header_time_seconds: i32,
        sr_header_time_nano_seconds: u32,
        sr_location_latitude: f64,
        sr_location_longitude: f64,
        sr_location_altitude: f32,
        sr_location_time_seconds: i32,
        sr_location_time_nano_seconds: u32,
        sr_location_speed_mps: f32,
        sr_location_orientation_degrees: i16,
        sr_status_task_status: u32,
        sr_status_battery_percentage: u16,
        sr_status_signal_strength_dbm: f32,
        sr_status_system_error: bool,

        cd_header_sender_id: String,
        cd_header_time_seconds: i32,
        cd_header_time_nano_seconds: u32,
        cd_detection_target_ID: String,
        cd_detection_target_type: u32,
        cd_detection_loc_latitude: f64,
        cd_detection_loc_longitude: f64,
        cd_detection_loc_altitude: f32,
        cd_detection_loc_time_seconds: i32,
        cd_detection_loc_time_nano_seconds: u32,
        cd_detection_loc_speed_mps: f32,
        cd_detection_loc_orientation_degrees: i16,
        cd_detection_confidence_level: f32,
        cd_detection_description: String,
        cd_detection_raw_data_link: String,

        tc_header_sender_id: String,
        tc_header_time_seconds: i32,
        tc_header_time_nano_seconds: u32,
        tc_receiver_id: String,
        tc_assignment_command: String,
        tc_assignment_loc_latitude: f64,
        tc_assignment_loc_longitude: f64,
        tc_assignment_loc_altitude: f32,
        tc_assignment_loc_time_seconds: i32,
        tc_assignment_loc_time_nano_seconds: u32,
        tc_assignment_loc_speed_mps: f32,
        tc_assignment_loc_orientation_degrees: i16,
    }
}
