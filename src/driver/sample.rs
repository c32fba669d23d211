// src/driver/sample.rs

use crate::common::{codec::StreamingRecord, command::LogicalCommand, types::Quaternion};

/// Standard gravity, m/s² per g.
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// Orientation and motion extracted from one streaming record, in SI units.
///
/// Each field is `None` when the record's slots did not carry it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuSample {
    pub orientation: Option<Quaternion>,
    /// Corrected gyro rate, rad/s.
    pub angular_velocity: Option<[f32; 3]>,
    /// Linear acceleration in global space, m/s².
    pub linear_acceleration: Option<[f32; 3]>,
}

impl ImuSample {
    pub fn from_record(record: &StreamingRecord) -> Self {
        let vector = |cmd: LogicalCommand| record.get(cmd).and_then(|v| v.as_vector3());
        ImuSample {
            orientation: record.quaternion(),
            angular_velocity: vector(LogicalCommand::GetCorrectedGyroRate),
            linear_acceleration: vector(LogicalCommand::GetCorrectedLinearAccelerationInGlobalSpace)
                .map(|g| g.map(|axis| axis * STANDARD_GRAVITY)),
        }
    }

    /// True when every field is present.
    pub fn is_complete(&self) -> bool {
        self.orientation.is_some() && self.angular_velocity.is_some() && self.linear_acceleration.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{codec::decode_frame, slots::StreamingSlots};

    #[test]
    fn test_sample_from_full_record() {
        let record = decode_frame(
            &StreamingSlots::QUATERNION_GYRO_LINEAR_ACCELERATION,
            b"0,0,0,1,0.1,0.2,0.3,0,0,1\r\n",
        )
        .unwrap();
        let sample = ImuSample::from_record(&record);

        assert!(sample.is_complete());
        assert_eq!(sample.orientation, Some(Quaternion::IDENTITY));
        assert_eq!(sample.angular_velocity, Some([0.1, 0.2, 0.3]));
        assert_eq!(sample.linear_acceleration, Some([0.0, 0.0, STANDARD_GRAVITY]));
    }

    #[test]
    fn test_sample_missing_fields() {
        let record = decode_frame(&StreamingSlots::EULER_TEMP, b"0.1,0.2,0.3,25.0\n").unwrap();
        let sample = ImuSample::from_record(&record);
        assert_eq!(sample, ImuSample::default());
        assert!(!sample.is_complete());
    }
}
