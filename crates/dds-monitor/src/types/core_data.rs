// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::topics::RecordKind;

flat_record! {
    /// Position and kinematics of one aircraft.
    ///
    /// Published on `CoreDataTopic` and its three numbered variants.
    pub struct FlatCoreData ("CoreData::FlatCoreData", RecordKind::CoreData) {
        /// Degrees, WGS-84.
        latitude: f64,
        /// Degrees, WGS-84.
        longitude: f64,
        /// Meters above mean sea level.
        altitude: f32,
        time_seconds: i32,
        time_nano_seconds: u32,
        speed_mps: f32,
        orientation_degrees: i16,
    }
}
