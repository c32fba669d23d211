// src/common/codec/error.rs

use crate::common::command::LogicalCommand;
use core::fmt;

/// Error type specific to request encoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EncodeError {
    /// Argument count differs from the catalog arity.
    ArityMismatch {
        command: LogicalCommand,
        expected: usize,
        got: usize,
    },
    /// A float was given for an integer parameter, or a float is not finite.
    ArgumentType { command: LogicalCommand, index: usize },
    /// The formatted request does not fit [`super::MAX_REQUEST_LEN`].
    RequestTooLong,
    /// Slot code is neither a streamable command nor `255`.
    InvalidStreamSlot(u32),
    /// More than eight slots were supplied.
    TooManySlots(usize),
}

/// Error type specific to reply decoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DecodeError {
    /// Reply field count differs from the expected shape.
    FieldCount { expected: usize, got: usize },
    /// Field at this index is not a valid number of the declared type.
    NumericParse { field: usize },
    /// Text reply is not ASCII or does not fit its buffer.
    InvalidText,
    /// Streaming frame field count differs from the configured slots.
    FrameFieldCount { expected: usize, got: usize },
}

impl From<core::str::Utf8Error> for DecodeError {
    fn from(_: core::str::Utf8Error) -> Self {
        DecodeError::InvalidText
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::ArityMismatch { command, expected, got } => {
                write!(f, "{:?} takes {} argument(s), got {}", command, expected, got)
            }
            EncodeError::ArgumentType { command, index } => {
                write!(f, "argument {} of {:?} has the wrong numeric kind", index, command)
            }
            EncodeError::RequestTooLong => write!(f, "request too long"),
            EncodeError::InvalidStreamSlot(code) => write!(f, "invalid streaming slot code {}", code),
            EncodeError::TooManySlots(n) => write!(f, "{} slots given, at most 8 allowed", n),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Simple display for now
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
