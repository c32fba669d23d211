// src/common/codec/stream.rs

use core::str;

use super::decode::{decode_fields, split_fields, strip_line_ending};
use super::error::DecodeError;
use crate::common::command::LogicalCommand;
use crate::common::slots::{StreamingSlots, MAX_SLOTS};
use crate::common::types::{DecodedValue, Quaternion};

/// The value carried by one used slot of a streaming frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotReading {
    /// Command occupying the slot.
    pub command: LogicalCommand,
    pub value: DecodedValue,
}

/// One decoded streaming frame: a reading per used slot, in slot order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamingRecord {
    readings: heapless::Vec<SlotReading, MAX_SLOTS>,
}

impl StreamingRecord {
    pub fn readings(&self) -> &[SlotReading] {
        &self.readings
    }

    /// Number of used slots in the frame.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Number of comma-separated wire fields the frame carried.
    pub fn field_count(&self) -> usize {
        self.readings.iter().map(|r| r.value.field_count()).sum()
    }

    /// First reading produced by `command`, if it occupies a slot.
    pub fn get(&self, command: LogicalCommand) -> Option<&DecodedValue> {
        self.readings
            .iter()
            .find(|r| r.command == command)
            .map(|r| &r.value)
    }

    /// First quaternion in the frame, tared or untared.
    pub fn quaternion(&self) -> Option<Quaternion> {
        self.readings.iter().find_map(|r| r.value.as_quaternion())
    }
}

/// Decodes one streaming frame laid out by `slots`.
///
/// The frame must carry exactly as many fields as the used slots declare;
/// otherwise it fails with [`DecodeError::FrameFieldCount`]. Unused slots
/// contribute nothing.
pub fn decode_frame(slots: &StreamingSlots, line: &[u8]) -> Result<StreamingRecord, DecodeError> {
    let body = str::from_utf8(strip_line_ending(line))?;
    let fields = split_fields(body);

    let expected = slots.field_count();
    let got = fields.clone().count();
    if got != expected {
        return Err(DecodeError::FrameFieldCount { expected, got });
    }

    let mut fields = fields;
    let mut offset = 0;
    let mut record = StreamingRecord::default();
    for command in slots.active() {
        let shape = command.response_shape();
        let value = decode_fields(shape, &mut fields, offset)?;
        offset += value.field_count();
        record
            .readings
            .push(SlotReading { command, value })
            .map_err(|_| DecodeError::FrameFieldCount { expected, got })?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::slots::StreamSlot;

    fn quaternion_temperature() -> StreamingSlots {
        StreamingSlots::from_commands(&[
            LogicalCommand::GetTaredOrientationAsQuaternion,
            LogicalCommand::GetTemperatureC,
        ])
        .unwrap()
    }

    #[test]
    fn test_quaternion_temperature_frame() {
        let record = decode_frame(&quaternion_temperature(), b"0.1,0.2,0.3,0.9,24.5\r\n").unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.field_count(), 5);
        assert_eq!(record.quaternion(), Some(Quaternion::new(0.1, 0.2, 0.3, 0.9)));
        assert_eq!(
            record.get(LogicalCommand::GetTemperatureC),
            Some(&DecodedValue::Float(24.5))
        );
        assert_eq!(record.get(LogicalCommand::GetCorrectedGyroRate), None);
    }

    #[test]
    fn test_short_frame_is_corrupt() {
        assert_eq!(
            decode_frame(&quaternion_temperature(), b"0.1,0.2,0.3,0.9\n"),
            Err(DecodeError::FrameFieldCount { expected: 5, got: 4 })
        );
    }

    #[test]
    fn test_bad_number_reports_its_frame_index() {
        assert_eq!(
            decode_frame(&quaternion_temperature(), b"0.1,0.2,0.3,0.9,hot\n"),
            Err(DecodeError::NumericParse { field: 4 })
        );
    }

    #[test]
    fn test_gyro_and_linear_acceleration_frame() {
        let record = decode_frame(
            &StreamingSlots::QUATERNION_GYRO_LINEAR_ACCELERATION,
            b"0,0,0,1,0.01,0.02,0.03,0.1,0.2,1.0\n",
        )
        .unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.field_count(), 10);
        assert_eq!(
            record
                .get(LogicalCommand::GetCorrectedLinearAccelerationInGlobalSpace)
                .and_then(DecodedValue::as_vector3),
            Some([0.1, 0.2, 1.0])
        );
    }

    #[test]
    fn test_unused_slots_are_skipped() {
        let slots = StreamingSlots::new(&[
            StreamSlot::Unused,
            StreamSlot::Data(LogicalCommand::GetTemperatureF),
            StreamSlot::Unused,
            StreamSlot::Data(LogicalCommand::GetConfidenceFactor),
        ])
        .unwrap();
        let record = decode_frame(&slots, b"75.2,0.9\n").unwrap();
        assert_eq!(record.readings()[0].command, LogicalCommand::GetTemperatureF);
        assert_eq!(record.readings()[1].value, DecodedValue::Float(0.9));
    }

    #[test]
    fn test_all_eight_slots_fill_the_record() {
        let slots = StreamingSlots::from_commands(&[LogicalCommand::GetTemperatureC; MAX_SLOTS]).unwrap();
        let record = decode_frame(&slots, b"1,2,3,4,5,6,7,8\n").unwrap();
        assert_eq!(record.len(), MAX_SLOTS);
        assert_eq!(record.readings()[7].value, DecodedValue::Float(8.0));
    }

    #[test]
    fn test_empty_slot_set_expects_empty_frame() {
        let slots = StreamingSlots::default();
        assert_eq!(decode_frame(&slots, b"\n"), Ok(StreamingRecord::default()));
        assert_eq!(
            decode_frame(&slots, b"1.0\n"),
            Err(DecodeError::FrameFieldCount { expected: 0, got: 1 })
        );
    }
}
