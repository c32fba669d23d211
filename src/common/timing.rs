// src/common/timing.rs

use core::time::Duration;

// The 3-Space ASCII protocol has no timing requirements of its own beyond
// the serial link; these are the driver's defaults.

/// Default baud rate of the 3-Space USB/serial interface.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

// === Byte Timing at 115200 Baud (8N1) ===
// 1 start bit + 8 data bits + 1 stop bit = 10 bits per byte

/// Nominal duration of a single byte (10 bits total) at 115200 baud.
pub const BYTE_DURATION: Duration = Duration::from_nanos(BITS_PER_BYTE * 1_000_000_000 / DEFAULT_BAUD_RATE as u64);

const BITS_PER_BYTE: u64 = 10;

// === Command/Response Timing ===

/// How long to wait for a complete reply line after the request is written.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Allowance on top of the streaming interval before a frame read times out.
pub const FRAME_TIMEOUT_MARGIN: Duration = Duration::from_millis(500);

/// Delay between polls of a non-blocking transport that reported `WouldBlock`.
pub const IO_POLL_INTERVAL_US: u32 = 100;

/// Extra time allowed for writing a request, beyond its nominal byte time.
pub const WRITE_TIMEOUT_MARGIN: Duration = Duration::from_millis(20);

/// Time allowed for the transmit buffer to drain.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(10);

// === Streaming Timing ===

/// Streaming interval presets (`:82,<interval_us>,0,0`).
pub const STREAM_INTERVAL_100_MS: Duration = Duration::from_millis(100);
pub const STREAM_INTERVAL_1000_MS: Duration = Duration::from_millis(1000);
pub const STREAM_INTERVAL_5000_MS: Duration = Duration::from_millis(5000);

// === Calibration ===

/// Time the sensor should be held still after gyro auto-calibration starts.
pub const GYRO_CALIBRATION_SETTLE: Duration = Duration::from_secs(3);
