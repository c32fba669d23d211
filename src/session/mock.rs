// src/session/mock.rs

//! In-memory transport and clock for session and driver tests.

use crate::common::{
    codec::StreamingRecord,
    command::LogicalCommand,
    hal_traits::{ImuSerial, ImuTimer},
    types::DecodedValue,
};
use crate::session::ImuPublisher;
use core::time::Duration;
use std::collections::{HashMap, VecDeque};
use std::string::String;
use std::vec::Vec;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

/// Scripted device: each complete request line written may trigger a canned
/// reply, which is queued for reading.
#[derive(Debug, Default)]
pub(crate) struct MockInterface {
    pub now_us: u64,
    pub rx: VecDeque<u8>,
    pub written: Vec<u8>,
    pending_line: Vec<u8>,
    scheduled: Vec<(u64, Vec<u8>)>,
    replies: HashMap<String, VecDeque<Vec<u8>>>,
    pub fail_writes: bool,
    /// Fails the write of byte number `n` once, then clears itself.
    pub fail_write_at: Option<usize>,
    pub fail_reads: bool,
    pub flushes: u32,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` to be delivered after `request` (including its `\n`) is written.
    pub fn reply_to(&mut self, request: &str, reply: &[u8]) -> &mut Self {
        self.replies
            .entry(String::from(request))
            .or_default()
            .push_back(reply.to_vec());
        self
    }

    /// Makes bytes readable immediately, as if left over from earlier traffic.
    pub fn stage_input(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }

    /// Makes `data` readable once the clock reaches `at_us`.
    pub fn deliver_at(&mut self, at_us: u64, data: &[u8]) {
        self.scheduled.push((at_us, data.to_vec()));
        self.scheduled.sort_by_key(|(at, _)| *at);
    }

    /// Everything written so far, as text.
    pub fn written_str(&self) -> &str {
        core::str::from_utf8(&self.written).unwrap()
    }

    /// Request lines written so far, without their newlines.
    pub fn requests(&self) -> Vec<&str> {
        self.written_str().lines().collect()
    }
}

impl ImuTimer for MockInterface {
    type Instant = MockInstant;

    fn now(&self) -> MockInstant {
        MockInstant(self.now_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.saturating_add(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us = self.now_us.saturating_add(ms as u64 * 1_000);
    }
}

impl ImuSerial for MockInterface {
    type Error = MockCommError;

    fn read_byte(&mut self) -> nb::Result<u8, MockCommError> {
        if self.fail_reads {
            return Err(nb::Error::Other(MockCommError));
        }
        while self.scheduled.first().is_some_and(|(at, _)| *at <= self.now_us) {
            let (_, data) = self.scheduled.remove(0);
            self.rx.extend(data);
        }
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), MockCommError> {
        if self.fail_writes {
            return Err(nb::Error::Other(MockCommError));
        }
        if self.fail_write_at == Some(self.written.len()) {
            self.fail_write_at = None;
            return Err(nb::Error::Other(MockCommError));
        }
        self.written.push(byte);
        self.pending_line.push(byte);
        if byte == b'\n' {
            let line = String::from_utf8_lossy(&self.pending_line).into_owned();
            self.pending_line.clear();
            if let Some(reply) = self.replies.get_mut(&line).and_then(|q| q.pop_front()) {
                self.rx.extend(reply);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), MockCommError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Publisher that keeps everything it is handed.
#[derive(Debug, Default)]
pub(crate) struct RecordingPublisher {
    pub readings: Vec<(StreamingRecord, MockInstant)>,
    pub scalars: Vec<(LogicalCommand, DecodedValue)>,
}

impl ImuPublisher<MockInstant> for RecordingPublisher {
    fn on_reading(&mut self, record: &StreamingRecord, received_at: MockInstant) {
        self.readings.push((record.clone(), received_at));
    }

    fn on_scalar_result(&mut self, command: LogicalCommand, value: &DecodedValue) {
        self.scalars.push((command, value.clone()));
    }
}
