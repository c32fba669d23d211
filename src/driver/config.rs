// src/driver/config.rs

use crate::common::{
    slots::{StreamingSlots, StreamingTiming},
    timing,
    types::AxisDirections,
};
use crate::session::SessionConfig;
use core::time::Duration;

/// Bring-up sequence settings for [`ImuDriver`](super::ImuDriver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Slot layout streamed after bring-up.
    pub slots: StreamingSlots,
    pub timing: StreamingTiming,
    /// Axis directions to set; `None` leaves the device's setting alone.
    pub axis_directions: Option<AxisDirections>,
    /// MI mode to set; `None` leaves the device's setting alone.
    pub mi_mode: Option<bool>,
    /// Run gyro auto-calibration before streaming.
    pub calibrate_gyro_on_start: bool,
    /// How long to hold still after starting gyro auto-calibration.
    pub gyro_calibration_settle: Duration,
    /// Tare with the current orientation before streaming.
    pub tare_on_start: bool,
    pub session: SessionConfig,
}

impl DriverConfig {
    pub fn with_slots(mut self, slots: StreamingSlots) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_timing(mut self, timing: StreamingTiming) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            slots: StreamingSlots::QUATERNION_GYRO_LINEAR_ACCELERATION,
            timing: StreamingTiming::EVERY_100_MS,
            axis_directions: Some(AxisDirections::ENU),
            mi_mode: None,
            calibrate_gyro_on_start: true,
            gyro_calibration_settle: timing::GYRO_CALIBRATION_SETTLE,
            tare_on_start: false,
            session: SessionConfig::default(),
        }
    }
}
