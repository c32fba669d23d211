// src/session/publisher.rs

use crate::common::{codec::StreamingRecord, command::LogicalCommand, types::DecodedValue};

/// Sink for decoded device output.
///
/// `I` is the timer's instant type; each streamed record is stamped with the
/// time its line finished arriving.
pub trait ImuPublisher<I> {
    /// Called once per decoded streaming frame or streaming batch reply.
    fn on_reading(&mut self, record: &StreamingRecord, received_at: I);

    /// Called with the decoded reply of a one-shot query.
    fn on_scalar_result(&mut self, _command: LogicalCommand, _value: &DecodedValue) {}
}

impl<I, P: ImuPublisher<I> + ?Sized> ImuPublisher<I> for &mut P {
    fn on_reading(&mut self, record: &StreamingRecord, received_at: I) {
        (**self).on_reading(record, received_at)
    }

    fn on_scalar_result(&mut self, command: LogicalCommand, value: &DecodedValue) {
        (**self).on_scalar_result(command, value)
    }
}
