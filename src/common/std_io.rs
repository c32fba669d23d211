// src/common/std_io.rs

//! Adapter from any `std::io::Read + Write` port (serial device, TCP socket,
//! pty) to the nb-style [`ImuSerial`] and [`ImuTimer`] traits.

use super::hal_traits::{ImuSerial, ImuTimer};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Wraps a blocking or non-blocking std port.
///
/// Ports opened with a short read timeout work best: `TimedOut` and
/// `WouldBlock` both map to `nb::Error::WouldBlock`, so the session's own
/// deadlines stay in charge.
#[derive(Debug)]
pub struct StdInterface<P> {
    port: P,
}

impl<P: Read + Write> StdInterface<P> {
    pub fn new(port: P) -> Self {
        StdInterface { port }
    }

    pub fn into_inner(self) -> P {
        self.port
    }
}

fn is_would_block(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted)
}

impl<P: Read + Write> ImuSerial for StdInterface<P> {
    type Error = std::io::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) if is_would_block(e.kind()) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        match self.port.write(&[byte]) {
            Ok(1) => Ok(()),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) if is_would_block(e.kind()) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        match self.port.flush() {
            Ok(()) => Ok(()),
            Err(e) if is_would_block(e.kind()) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }
}

impl<P> ImuTimer for StdInterface<P> {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_bytes_then_would_block() {
        let mut iface = StdInterface::new(Cursor::new(b"1\n".to_vec()));
        assert_eq!(iface.read_byte().unwrap(), b'1');
        assert_eq!(iface.read_byte().unwrap(), b'\n');
        assert!(matches!(iface.read_byte(), Err(nb::Error::WouldBlock)));
    }

    #[test]
    fn test_writes_bytes() {
        let mut iface = StdInterface::new(Cursor::new(Vec::new()));
        for b in b":0\n" {
            iface.write_byte(*b).unwrap();
        }
        iface.flush().unwrap();
        assert_eq!(iface.into_inner().into_inner(), b":0\n".to_vec());
    }
}
