// src/session/state.rs

//! The session state machine, free of any I/O.
//!
//! The device echoes no request identifier, so at most one request may be
//! outstanding: a reply is always matched to the single pending command.

use crate::common::{
    codec::{decode, decode_frame, StreamingRecord},
    command::{LogicalCommand, ResponseShape},
    error::ImuError,
    slots::{StreamingSlotConfig, StreamingSlots, StreamingTiming},
    types::{DecodedValue, Numeric, SessionPhase},
};
use core::fmt::Debug;

/// Where the session is in its request/response or streaming lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingResponse(LogicalCommand),
    Streaming(StreamingSlotConfig),
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::AwaitingResponse(_) => SessionPhase::AwaitingResponse,
            SessionState::Streaming(_) => SessionPhase::Streaming,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    #[inline]
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionState::Streaming(_))
    }

    /// Command whose reply is outstanding, if any.
    pub fn pending(&self) -> Option<LogicalCommand> {
        match self {
            SessionState::AwaitingResponse(cmd) => Some(*cmd),
            _ => None,
        }
    }
}

/// Outcome of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The command has no reply; it completed once written.
    Written,
    Value(DecodedValue),
    /// Reply to `GetStreamingBatch`.
    Batch(StreamingRecord),
}

impl Reply {
    pub fn into_value(self) -> Option<DecodedValue> {
        match self {
            Reply::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_batch(self) -> Option<StreamingRecord> {
        match self {
            Reply::Batch(r) => Some(r),
            _ => None,
        }
    }
}

/// Configuration a request will record once it has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staged {
    Nothing,
    Slots(StreamingSlots),
    Timing(StreamingTiming),
}

impl Staged {
    /// Parses the configuration carried by `cmd`'s arguments.
    pub fn from_request<E: Debug>(cmd: LogicalCommand, args: &[Numeric]) -> Result<Self, ImuError<E>> {
        Ok(match cmd {
            LogicalCommand::SetStreamingSlots => Staged::Slots(StreamingSlots::from_args(args)?),
            LogicalCommand::SetStreamingTiming => Staged::Timing(StreamingTiming::from_args(args)?),
            _ => Staged::Nothing,
        })
    }
}

/// Session state plus the streaming configuration recorded from
/// successfully written `SetStreamingSlots` / `SetStreamingTiming` requests.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: SessionState,
    slots: Option<StreamingSlots>,
    timing: Option<StreamingTiming>,
    first_frame_pending: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn pending(&self) -> Option<LogicalCommand> {
        self.state.pending()
    }

    pub fn configured_slots(&self) -> Option<&StreamingSlots> {
        self.slots.as_ref()
    }

    pub fn configured_timing(&self) -> Option<&StreamingTiming> {
        self.timing.as_ref()
    }

    /// Configuration `StartStreaming` would start with, once both parts are set.
    pub fn streaming_config(&self) -> Option<StreamingSlotConfig> {
        match (self.slots, self.timing) {
            (Some(slots), Some(timing)) => Some(StreamingSlotConfig { slots, timing }),
            _ => None,
        }
    }

    /// True from `StartStreaming` until the first frame line arrives.
    ///
    /// The device holds that frame back by the configured start delay.
    pub fn awaiting_first_frame(&self) -> bool {
        self.first_frame_pending && self.state.is_streaming()
    }

    /// Records that a streaming frame line was received.
    pub fn on_frame_received(&mut self) {
        self.first_frame_pending = false;
    }

    /// Checks that `cmd` may be issued in the current state.
    pub fn check_issue<E: Debug>(&self, cmd: LogicalCommand) -> Result<(), ImuError<E>> {
        let invalid = || ImuError::InvalidStateTransition {
            state: self.state.phase(),
            command: cmd,
        };
        match self.state {
            SessionState::AwaitingResponse(pending) => Err(ImuError::CommandInFlight {
                pending,
                rejected: cmd,
            }),
            SessionState::Streaming(_) => match cmd {
                LogicalCommand::StopStreaming => Ok(()),
                _ => Err(invalid()),
            },
            SessionState::Idle => match cmd {
                LogicalCommand::StartStreaming if self.streaming_config().is_none() => Err(invalid()),
                LogicalCommand::GetStreamingBatch if self.slots.is_none() => Err(invalid()),
                _ => Ok(()),
            },
        }
    }

    /// Applies a request that was written to the transport.
    pub fn on_request_sent(&mut self, cmd: LogicalCommand, staged: Staged) {
        match staged {
            Staged::Slots(slots) => self.slots = Some(slots),
            Staged::Timing(timing) => self.timing = Some(timing),
            Staged::Nothing => {}
        }
        if cmd.resets_device() {
            self.slots = None;
            self.timing = None;
        }

        self.state = match cmd {
            LogicalCommand::StartStreaming => match self.streaming_config() {
                Some(config) => SessionState::Streaming(config),
                None => SessionState::Idle,
            },
            LogicalCommand::StopStreaming => SessionState::Idle,
            _ if cmd.response_shape().expects_reply() => SessionState::AwaitingResponse(cmd),
            _ => SessionState::Idle,
        };
        self.first_frame_pending = self.state.is_streaming();
    }

    /// Completes the pending request with its reply line.
    ///
    /// The state returns to `Idle` whether or not the line decodes.
    pub fn on_response<E: Debug>(&mut self, line: &[u8]) -> Result<Reply, ImuError<E>> {
        let cmd = self.pending().ok_or(ImuError::<E>::NoPendingRequest)?;
        self.state = SessionState::Idle;

        match cmd.response_shape() {
            ResponseShape::StreamingBatch => {
                let slots = self.slots.ok_or(ImuError::<E>::InvalidStateTransition {
                    state: SessionPhase::Idle,
                    command: cmd,
                })?;
                Ok(Reply::Batch(decode_frame(&slots, line)?))
            }
            _ => Ok(Reply::Value(decode(cmd, line)?)),
        }
    }

    /// Gives up on the pending request (timeout or transport error).
    pub fn abandon(&mut self) {
        if let SessionState::AwaitingResponse(_) = self.state {
            self.state = SessionState::Idle;
        }
    }

    /// Decodes a frame against the active streaming configuration.
    pub fn decode_streaming_frame<E: Debug>(&self, line: &[u8]) -> Result<StreamingRecord, ImuError<E>> {
        match &self.state {
            SessionState::Streaming(config) => Ok(decode_frame(&config.slots, line)?),
            _ => Err(ImuError::NotStreaming),
        }
    }
}
