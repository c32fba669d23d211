// src/session/streaming.rs

use super::{ImuPublisher, ImuSession, MAX_LINE_LEN};
use crate::common::{
    codec::StreamingRecord,
    error::ImuError,
    hal_traits::{ImuInstant, ImuSerial, ImuTimer},
    types::SessionPhase,
};
use core::fmt::Debug;
use log::{debug, warn};

/// Counters from a [`stream`](ImuSession::stream) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frames decoded and published.
    pub frames: u64,
    /// Frames dropped because they did not decode.
    pub dropped: u64,
}

impl<IF> ImuSession<IF>
where
    IF: ImuSerial + ImuTimer,
    IF::Error: Debug,
    IF::Instant: ImuInstant,
{
    /// Reads and decodes the next streaming frame.
    ///
    /// The read deadline is the streaming interval plus the configured
    /// margin. The first frame after `StartStreaming` also gets the
    /// configured start delay. Returns the record and the time its line
    /// completed.
    pub fn read_frame(&mut self) -> Result<(StreamingRecord, IF::Instant), ImuError<IF::Error>> {
        let timing = match self.state() {
            super::SessionState::Streaming(config) => config.timing,
            _ => return Err(ImuError::NotStreaming),
        };
        let mut timeout = timing.interval() + self.config.frame_timeout_margin;
        if self.machine.awaiting_first_frame() {
            timeout += timing.start_delay();
        }
        let mut buffer = [0u8; MAX_LINE_LEN];

        let result = self.read_line(&mut buffer, timeout);
        if matches!(result, Ok(_) | Err(ImuError::BufferOverflow { .. })) {
            self.machine.on_frame_received();
        }
        let line = result?;
        let received_at = self.interface.now();
        let record = self.machine.decode_streaming_frame::<IF::Error>(line)?;
        Ok((record, received_at))
    }

    /// Publishes frames until `should_stop` returns true or a fatal error occurs.
    ///
    /// Frames that fail to decode are logged and skipped. Timeouts and
    /// transport errors end the loop; the session stays `Streaming` so the
    /// caller can still send `StopStreaming`.
    pub fn stream<P, S>(&mut self, publisher: &mut P, mut should_stop: S) -> Result<StreamStats, ImuError<IF::Error>>
    where
        P: ImuPublisher<IF::Instant>,
        S: FnMut() -> bool,
    {
        if self.state().phase() != SessionPhase::Streaming {
            return Err(ImuError::NotStreaming);
        }

        let mut stats = StreamStats::default();
        while !should_stop() {
            match self.read_frame() {
                Ok((record, received_at)) => {
                    publisher.on_reading(&record, received_at);
                    stats.frames += 1;
                }
                Err(e) if e.is_recoverable_frame_error() => {
                    warn!("dropping streaming frame: {}", e);
                    stats.dropped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        debug!("streaming loop stopped after {} frame(s), {} dropped", stats.frames, stats.dropped);
        Ok(stats)
    }
}
