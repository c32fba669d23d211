// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time from an [`ImuTimer`].
///
/// Blanket-implemented for any type with the needed arithmetic, so
/// `std::time::Instant` and simple tick counters both qualify.
pub trait ImuInstant:
    Copy + Debug + PartialOrd + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> ImuInstant for T where
    T: Copy + Debug + PartialOrd + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the clock and delay operations the session needs.
pub trait ImuTimer {
    /// Monotonic instant type.
    type Instant: ImuInstant;

    /// Current time.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}

/// Abstraction for non-blocking, byte-oriented serial communication with the IMU.
pub trait ImuSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// [`ImuTimer`] built from an embedded-hal delay provider and a clock function.
///
/// embedded-hal v1 has no clock trait, so the caller supplies `now` as a
/// closure over whatever monotonic counter the platform has.
#[cfg(feature = "embedded-hal")]
pub struct HalTimer<D, F> {
    delay: D,
    clock: F,
}

#[cfg(feature = "embedded-hal")]
impl<D, F, I> HalTimer<D, F>
where
    D: embedded_hal::delay::DelayNs,
    F: Fn() -> I,
    I: ImuInstant,
{
    pub fn new(delay: D, clock: F) -> Self {
        HalTimer { delay, clock }
    }

    pub fn release(self) -> (D, F) {
        (self.delay, self.clock)
    }
}

#[cfg(feature = "embedded-hal")]
impl<D, F, I> ImuTimer for HalTimer<D, F>
where
    D: embedded_hal::delay::DelayNs,
    F: Fn() -> I,
    I: ImuInstant,
{
    type Instant = I;

    fn now(&self) -> I {
        (self.clock)()
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
