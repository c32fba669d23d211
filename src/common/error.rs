// src/common/error.rs

use super::codec::{DecodeError, EncodeError};
use super::command::LogicalCommand;
use super::types::SessionPhase;

#[derive(Debug, thiserror::Error)]
pub enum ImuError<E = ()>
where
    E: core::fmt::Debug, // Still need Debug for the generic Io error
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// No complete line arrived before the read deadline.
    #[error("Operation timed out")]
    Timeout,

    /// Number of arguments does not match the command's declared arity.
    #[error("{command:?} takes {expected} argument(s), got {got}")]
    ArityMismatch {
        command: LogicalCommand,
        expected: usize,
        got: usize,
    },

    /// An argument cannot be formatted as the kind the command declares.
    #[error("Argument {index} of {command:?} has the wrong numeric kind")]
    ArgumentType { command: LogicalCommand, index: usize },

    /// Formatted request does not fit the request buffer.
    #[error("Request too long for the request buffer")]
    RequestTooLong,

    /// Reply field count does not match the expected response shape.
    #[error("Malformed response: expected {expected} field(s), got {got}")]
    MalformedResponse { expected: usize, got: usize },

    /// A reply field could not be parsed as the declared numeric type.
    #[error("Could not parse response field {field} as a number")]
    NumericParseError { field: usize },

    /// A text reply was not printable ASCII or did not fit its buffer.
    #[error("Invalid text in response")]
    InvalidText,

    /// The command is not legal in the current session state.
    #[error("{command:?} is not allowed while {state:?}")]
    InvalidStateTransition {
        state: SessionPhase,
        command: LogicalCommand,
    },

    /// A reply was awaited but no request is outstanding.
    #[error("No request is awaiting a response")]
    NoPendingRequest,

    /// A query was asked of a command that does not reply with a value.
    #[error("{command:?} does not reply with a value")]
    NoValueReply { command: LogicalCommand },

    /// A streaming frame was requested outside a streaming session.
    #[error("Session is not streaming")]
    NotStreaming,

    /// A request is already waiting for its reply.
    #[error("{rejected:?} rejected: {pending:?} is still awaiting its response")]
    CommandInFlight {
        pending: LogicalCommand,
        rejected: LogicalCommand,
    },

    /// A streaming frame did not carry the configured number of fields.
    #[error("Corrupt streaming frame: expected {expected} field(s), got {got}")]
    StreamingFrameCorrupt { expected: usize, got: usize },

    /// A configuration reply decoded but named no known setting.
    #[error("{command:?} replied with unknown value {value}")]
    UnexpectedValue { command: LogicalCommand, value: u32 },

    /// Buffer provided was too small.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Slot code does not name a streamable command.
    #[error("Invalid streaming slot code: {0}")]
    InvalidStreamSlot(u32),

    /// More slots were supplied than the device supports.
    #[error("Too many streaming slots: {0}")]
    TooManySlots(usize),
}

impl<E: core::fmt::Debug> From<EncodeError> for ImuError<E> {
    fn from(e: EncodeError) -> Self {
        match e {
            EncodeError::ArityMismatch { command, expected, got } => {
                ImuError::ArityMismatch { command, expected, got }
            }
            EncodeError::ArgumentType { command, index } => ImuError::ArgumentType { command, index },
            EncodeError::RequestTooLong => ImuError::RequestTooLong,
            EncodeError::InvalidStreamSlot(code) => ImuError::InvalidStreamSlot(code),
            EncodeError::TooManySlots(count) => ImuError::TooManySlots(count),
        }
    }
}

impl<E: core::fmt::Debug> From<DecodeError> for ImuError<E> {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::FieldCount { expected, got } => ImuError::MalformedResponse { expected, got },
            DecodeError::NumericParse { field } => ImuError::NumericParseError { field },
            DecodeError::InvalidText => ImuError::InvalidText,
            DecodeError::FrameFieldCount { expected, got } => {
                ImuError::StreamingFrameCorrupt { expected, got }
            }
        }
    }
}

impl<E: core::fmt::Debug> ImuError<E> {
    /// True for errors that a streaming loop drops and moves past.
    pub fn is_recoverable_frame_error(&self) -> bool {
        matches!(
            self,
            ImuError::StreamingFrameCorrupt { .. }
                | ImuError::NumericParseError { .. }
                | ImuError::InvalidText
                | ImuError::BufferOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_map_to_taxonomy() {
        let e: ImuError = DecodeError::FieldCount { expected: 4, got: 3 }.into();
        assert!(matches!(e, ImuError::MalformedResponse { expected: 4, got: 3 }));

        let e: ImuError = DecodeError::NumericParse { field: 2 }.into();
        assert!(matches!(e, ImuError::NumericParseError { field: 2 }));

        let e: ImuError = DecodeError::FrameFieldCount { expected: 5, got: 4 }.into();
        assert!(matches!(e, ImuError::StreamingFrameCorrupt { expected: 5, got: 4 }));
    }

    #[test]
    fn test_encode_errors_map_to_taxonomy() {
        let e: ImuError<u8> = EncodeError::ArityMismatch {
            command: LogicalCommand::SetMIModeEnabled,
            expected: 1,
            got: 0,
        }
        .into();
        assert!(matches!(e, ImuError::ArityMismatch { expected: 1, got: 0, .. }));
    }

    #[test]
    fn test_display_messages() {
        let e: ImuError = ImuError::CommandInFlight {
            pending: LogicalCommand::GetTemperatureC,
            rejected: LogicalCommand::GetFirmwareVersionString,
        };
        assert_eq!(
            e.to_string(),
            "GetFirmwareVersionString rejected: GetTemperatureC is still awaiting its response"
        );
        let e: ImuError = ImuError::StreamingFrameCorrupt { expected: 5, got: 4 };
        assert_eq!(e.to_string(), "Corrupt streaming frame: expected 5 field(s), got 4");
    }

    #[test]
    fn test_recoverable_frame_errors() {
        assert!(ImuError::<()>::StreamingFrameCorrupt { expected: 5, got: 4 }.is_recoverable_frame_error());
        assert!(!ImuError::<()>::Timeout.is_recoverable_frame_error());
        assert!(!ImuError::Io(()).is_recoverable_frame_error());
    }
}
