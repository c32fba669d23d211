// src/session/io_helpers.rs

use super::ImuSession;
use crate::common::{
    error::ImuError,
    hal_traits::{ImuInstant, ImuSerial, ImuTimer},
    timing,
};
use core::fmt::Debug;
use core::time::Duration;
use log::{trace, warn};
use nb::Result as NbResult;

impl<IF> ImuSession<IF>
where
    IF: ImuSerial + ImuTimer,
    IF::Error: Debug,
    IF::Instant: ImuInstant,
{
    /// Polls a non-blocking operation until it completes or `deadline` passes.
    pub(super) fn execute_blocking_io_until<FN, T>(
        &mut self,
        deadline: IF::Instant,
        mut f: FN,
    ) -> Result<T, ImuError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(ImuError::Timeout);
                    }
                    self.interface.delay_us(self.config.poll_interval_us);
                }
                Err(nb::Error::Other(e)) => return Err(ImuError::Io(e)),
            }
        }
    }

    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        f: FN,
    ) -> Result<T, ImuError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;
        self.execute_blocking_io_until(deadline, f)
    }

    /// Writes an encoded request and flushes it.
    ///
    /// If the write fails part way, a bare `\n` is sent on a best-effort
    /// basis so the device discards the fragment instead of prefixing it to
    /// the next request. The original error is returned either way.
    pub(super) fn send_request_bytes(&mut self, bytes: &[u8]) -> Result<(), ImuError<IF::Error>> {
        let write_timeout = timing::BYTE_DURATION * bytes.len() as u32 + timing::WRITE_TIMEOUT_MARGIN;
        let deadline = self.interface.now() + write_timeout;

        for (sent, byte) in bytes.iter().enumerate() {
            if let Err(e) = self.execute_blocking_io_until(deadline, |iface| iface.write_byte(*byte)) {
                if sent > 0 {
                    warn!("request write failed after {} byte(s), terminating fragment", sent);
                    let _ = self.execute_blocking_io_with_timeout(timing::WRITE_TIMEOUT_MARGIN, |iface| {
                        iface.write_byte(b'\n')
                    });
                }
                return Err(e);
            }
        }
        self.execute_blocking_io_with_timeout(timing::FLUSH_TIMEOUT, |iface| iface.flush())?;
        Ok(())
    }

    /// Reads one line, up to and including `\n`, into `buffer`.
    ///
    /// The whole line must arrive within `timeout`. A line longer than the
    /// buffer is consumed through its terminator and reported as
    /// `BufferOverflow`, leaving the stream aligned on the next line.
    pub(super) fn read_line<'buf>(
        &mut self,
        buffer: &'buf mut [u8],
        timeout: Duration,
    ) -> Result<&'buf [u8], ImuError<IF::Error>> {
        let deadline = self.interface.now() + timeout;
        let mut bytes_read = 0;
        let mut overflowed = false;

        loop {
            let byte = self.execute_blocking_io_until(deadline, |iface| iface.read_byte())?;

            if overflowed || bytes_read >= buffer.len() {
                overflowed = true;
                bytes_read += 1;
                if byte == b'\n' {
                    return Err(ImuError::BufferOverflow {
                        needed: bytes_read,
                        got: buffer.len(),
                    });
                }
                continue;
            }

            buffer[bytes_read] = byte;
            bytes_read += 1;
            if byte == b'\n' {
                trace!("read line of {} byte(s)", bytes_read);
                return Ok(&buffer[..bytes_read]);
            }
        }
    }

    /// Throws away whatever input is already buffered on the transport.
    ///
    /// Returns the number of bytes dropped. Stops at the first `WouldBlock`
    /// or after `stale_drain_limit` bytes.
    pub(super) fn discard_stale_input(&mut self) -> Result<usize, ImuError<IF::Error>> {
        let mut dropped = 0;
        while dropped < self.config.stale_drain_limit {
            match self.interface.read_byte() {
                Ok(_) => dropped += 1,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(ImuError::Io(e)),
            }
        }
        if dropped > 0 {
            warn!("discarded {} byte(s) of stale input", dropped);
        }
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mock::{MockCommError, MockInterface};

    fn session() -> ImuSession<MockInterface> {
        ImuSession::new(MockInterface::new())
    }

    #[test]
    fn test_execute_blocking_io_with_timeout() {
        let mut s = session();

        // Completes after a few WouldBlocks
        let mut calls = 0;
        let result: Result<i32, _> = s.execute_blocking_io_with_timeout(Duration::from_millis(10), |_| {
            calls += 1;
            if calls < 4 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(123)
            }
        });
        assert_eq!(result.unwrap(), 123);
        assert_eq!(calls, 4);
        assert_eq!(s.interface.now_us, 300);

        // Never completes
        s.interface.now_us = 0;
        let result: Result<(), _> =
            s.execute_blocking_io_with_timeout(Duration::from_millis(1), |_| Err(nb::Error::WouldBlock));
        assert!(matches!(result, Err(ImuError::Timeout)));
        assert_eq!(s.interface.now_us, 1_000);

        // Transport error passes through
        let result: Result<(), _> = s
            .execute_blocking_io_with_timeout(Duration::from_millis(1), |_| Err(nb::Error::Other(MockCommError)));
        assert!(matches!(result, Err(ImuError::Io(MockCommError))));
    }

    #[test]
    fn test_read_line_success() {
        let mut s = session();
        s.interface.stage_input(b"0.1,0.2,0.3,0.9\r\nnext");
        let mut buffer = [0u8; 32];

        let line = s.read_line(&mut buffer, Duration::from_millis(100)).unwrap();
        assert_eq!(line, b"0.1,0.2,0.3,0.9\r\n");
        assert_eq!(s.interface.rx.len(), 4);
    }

    #[test]
    fn test_read_line_timeout_no_data() {
        let mut s = session();
        let mut buffer = [0u8; 32];
        let result = s.read_line(&mut buffer, Duration::from_millis(100));
        assert!(matches!(result, Err(ImuError::Timeout)));
    }

    #[test]
    fn test_read_line_timeout_partial_data() {
        let mut s = session();
        s.interface.stage_input(b"0.1,0.2");
        let mut buffer = [0u8; 32];
        let result = s.read_line(&mut buffer, Duration::from_millis(100));
        assert!(matches!(result, Err(ImuError::Timeout)));
    }

    #[test]
    fn test_read_line_buffer_overflow_consumes_line() {
        let mut s = session();
        s.interface.stage_input(b"1.2345678\n21.5\n");
        let mut buffer = [0u8; 8];

        let result = s.read_line(&mut buffer, Duration::from_millis(100));
        assert!(matches!(result, Err(ImuError::BufferOverflow { needed: 10, got: 8 })));

        let line = s.read_line(&mut buffer, Duration::from_millis(100)).unwrap();
        assert_eq!(line, b"21.5\n");
    }

    #[test]
    fn test_send_request_bytes() {
        let mut s = session();
        s.send_request_bytes(b":0\n").unwrap();
        assert_eq!(s.interface.written_str(), ":0\n");
        assert_eq!(s.interface.flushes, 1);

        s.interface.fail_writes = true;
        let result = s.send_request_bytes(b":1\n");
        assert!(matches!(result, Err(ImuError::Io(MockCommError))));
    }

    #[test]
    fn test_interrupted_request_is_terminated() {
        let mut s = session();
        s.interface.fail_write_at = Some(2);
        let result = s.send_request_bytes(b":43\n");
        assert!(matches!(result, Err(ImuError::Io(MockCommError))));
        assert_eq!(s.interface.written_str(), ":4\n");
        assert_eq!(s.interface.flushes, 0);
    }

    #[test]
    fn test_failure_on_first_byte_writes_nothing() {
        let mut s = session();
        s.interface.fail_write_at = Some(0);
        let result = s.send_request_bytes(b":43\n");
        assert!(matches!(result, Err(ImuError::Io(MockCommError))));
        assert!(s.interface.written.is_empty());
    }

    #[test]
    fn test_discard_stale_input() {
        let mut s = session();
        assert_eq!(s.discard_stale_input().unwrap(), 0);

        s.interface.stage_input(b"0,0,0,1\n0,0");
        assert_eq!(s.discard_stale_input().unwrap(), 11);
        assert!(s.interface.rx.is_empty());
    }

    #[test]
    fn test_discard_stale_input_is_bounded() {
        let config = crate::session::SessionConfig {
            stale_drain_limit: 4,
            ..Default::default()
        };
        let mut s = ImuSession::with_config(MockInterface::new(), config);
        s.interface.stage_input(b"abcdefgh");
        assert_eq!(s.discard_stale_input().unwrap(), 4);
        assert_eq!(s.interface.rx.len(), 4);
    }
}
