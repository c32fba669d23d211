// src/session/transaction.rs

use super::{ImuPublisher, ImuSession, Reply, SessionState, Staged, MAX_LINE_LEN};
use crate::common::{
    codec::encode,
    command::{LogicalCommand, ResponseShape},
    error::ImuError,
    hal_traits::{ImuInstant, ImuSerial, ImuTimer},
    slots::{StreamingSlots, StreamingTiming},
    types::{DecodedValue, Numeric},
};
use core::fmt::Debug;
use log::{debug, warn};

impl<IF> ImuSession<IF>
where
    IF: ImuSerial + ImuTimer,
    IF::Error: Debug,
    IF::Instant: ImuInstant,
{
    /// Encodes and writes `cmd` without waiting for its reply.
    ///
    /// Nothing is written and the state is unchanged if the command is not
    /// legal now or its arguments do not encode. On success the session is
    /// `AwaitingResponse` for commands with a reply, `Streaming` after
    /// `StartStreaming`, and `Idle` otherwise.
    pub fn issue(&mut self, cmd: LogicalCommand, args: &[Numeric]) -> Result<(), ImuError<IF::Error>> {
        self.machine.check_issue::<IF::Error>(cmd)?;
        let request = encode(cmd, args)?;
        let staged = Staged::from_request::<IF::Error>(cmd, args)?;

        if self.machine.state().is_idle() {
            self.discard_stale_input()?;
        }

        debug!("-> {}", request);
        self.send_request_bytes(request.as_bytes())?;
        self.machine.on_request_sent(cmd, staged);

        if cmd == LogicalCommand::StopStreaming {
            self.discard_stale_input()?;
        }
        Ok(())
    }

    /// Waits for and decodes the reply to the outstanding request.
    ///
    /// A timeout or transport error abandons the request and returns the
    /// session to `Idle`; the caller may reissue.
    pub fn await_response(&mut self) -> Result<Reply, ImuError<IF::Error>> {
        let cmd = self.machine.pending().ok_or(ImuError::<IF::Error>::NoPendingRequest)?;
        let timeout = self.config.response_timeout;
        let mut buffer = [0u8; MAX_LINE_LEN];

        let line = match self.read_line(&mut buffer, timeout) {
            Ok(line) => line,
            Err(e) => {
                warn!("{} got no usable reply: {}", cmd, e);
                self.machine.abandon();
                return Err(e);
            }
        };
        debug!("<- {:?}", core::str::from_utf8(line).unwrap_or("<non-utf8>"));
        self.machine.on_response(line)
    }

    /// Issues `cmd` and, if it has a reply, waits for it.
    pub fn execute(&mut self, cmd: LogicalCommand, args: &[Numeric]) -> Result<Reply, ImuError<IF::Error>> {
        self.issue(cmd, args)?;
        match self.machine.state() {
            SessionState::AwaitingResponse(_) => self.await_response(),
            _ => Ok(Reply::Written),
        }
    }

    /// Like [`execute`](Self::execute), handing the reply to `publisher`.
    pub fn execute_and_publish<P>(
        &mut self,
        cmd: LogicalCommand,
        args: &[Numeric],
        publisher: &mut P,
    ) -> Result<Reply, ImuError<IF::Error>>
    where
        P: ImuPublisher<IF::Instant>,
    {
        let reply = self.execute(cmd, args)?;
        match &reply {
            Reply::Value(value) => publisher.on_scalar_result(cmd, value),
            Reply::Batch(record) => publisher.on_reading(record, self.interface.now()),
            Reply::Written => {}
        }
        Ok(reply)
    }

    /// Runs a query that must produce a value.
    ///
    /// Commands without a value reply (set and action commands, and
    /// `GetStreamingBatch`) fail with `NoValueReply` before anything is
    /// written.
    pub fn query(&mut self, cmd: LogicalCommand, args: &[Numeric]) -> Result<DecodedValue, ImuError<IF::Error>> {
        if matches!(cmd.response_shape(), ResponseShape::None | ResponseShape::StreamingBatch) {
            return Err(ImuError::NoValueReply { command: cmd });
        }
        match self.execute(cmd, args)? {
            Reply::Value(value) => Ok(value),
            _ => Err(ImuError::MalformedResponse {
                expected: cmd.response_shape().field_count().unwrap_or(1),
                got: 0,
            }),
        }
    }

    pub fn set_streaming_slots(&mut self, slots: &StreamingSlots) -> Result<(), ImuError<IF::Error>> {
        self.execute(LogicalCommand::SetStreamingSlots, &slots.to_args())?;
        Ok(())
    }

    pub fn set_streaming_timing(&mut self, timing: &StreamingTiming) -> Result<(), ImuError<IF::Error>> {
        self.execute(LogicalCommand::SetStreamingTiming, &timing.to_args())?;
        Ok(())
    }

    pub fn start_streaming(&mut self) -> Result<(), ImuError<IF::Error>> {
        self.execute(LogicalCommand::StartStreaming, &[])?;
        Ok(())
    }

    /// Sends `:86`. Accepted in any state but `AwaitingResponse`.
    pub fn stop_streaming(&mut self) -> Result<(), ImuError<IF::Error>> {
        self.execute(LogicalCommand::StopStreaming, &[])?;
        Ok(())
    }
}
