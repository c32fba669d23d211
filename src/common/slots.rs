// src/common/slots.rs

//! Streaming slot and timing configuration (`:80` / `:82`).

use core::fmt;
use core::time::Duration;

use super::codec::EncodeError;
use super::command::LogicalCommand;
use super::timing;
use super::types::Numeric;

/// Number of slots in a streaming frame.
pub const MAX_SLOTS: usize = 8;
/// Slot code marking an unused slot.
pub const UNUSED_SLOT_CODE: u8 = 255;

/// One streaming slot: a streamable data command, or unused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum StreamSlot {
    #[default]
    Unused,
    Data(LogicalCommand),
}

impl StreamSlot {
    /// Tries to convert a wire slot code into a slot.
    pub fn from_code(code: u32) -> Result<Self, EncodeError> {
        if code == UNUSED_SLOT_CODE as u32 {
            return Ok(StreamSlot::Unused);
        }
        let cmd = u8::try_from(code)
            .ok()
            .and_then(LogicalCommand::from_code)
            .ok_or(EncodeError::InvalidStreamSlot(code))?;
        StreamSlot::data(cmd)
    }

    /// Slot for `cmd`, if the device can stream it.
    pub fn data(cmd: LogicalCommand) -> Result<Self, EncodeError> {
        if cmd.is_streamable() {
            Ok(StreamSlot::Data(cmd))
        } else {
            Err(EncodeError::InvalidStreamSlot(cmd.code() as u32))
        }
    }

    #[inline]
    pub const fn code(&self) -> u8 {
        match self {
            StreamSlot::Unused => UNUSED_SLOT_CODE,
            StreamSlot::Data(cmd) => cmd.code(),
        }
    }

    /// Number of comma-separated fields this slot contributes to a frame.
    pub fn field_count(&self) -> usize {
        match self {
            StreamSlot::Unused => 0,
            StreamSlot::Data(cmd) => cmd.response_shape().field_count().unwrap_or(0),
        }
    }
}

/// The eight slots of a streaming frame, replaced wholesale on reconfiguration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct StreamingSlots([StreamSlot; MAX_SLOTS]);

impl StreamingSlots {
    /// Euler angles + temperature (°C).
    pub const EULER_TEMP: StreamingSlots = Self::preset(&[
        LogicalCommand::GetTaredOrientationAsEulerAngles,
        LogicalCommand::GetTemperatureC,
    ]);
    /// Euler angles + quaternion.
    pub const EULER_QUATERNION: StreamingSlots = Self::preset(&[
        LogicalCommand::GetTaredOrientationAsEulerAngles,
        LogicalCommand::GetTaredOrientationAsQuaternion,
    ]);
    /// Quaternion + Euler angles.
    pub const QUATERNION_EULER: StreamingSlots = Self::preset(&[
        LogicalCommand::GetTaredOrientationAsQuaternion,
        LogicalCommand::GetTaredOrientationAsEulerAngles,
    ]);
    pub const EULER: StreamingSlots =
        Self::preset(&[LogicalCommand::GetTaredOrientationAsEulerAngles]);
    pub const QUATERNION: StreamingSlots =
        Self::preset(&[LogicalCommand::GetTaredOrientationAsQuaternion]);
    /// Quaternion + corrected gyro rate + linear acceleration in global space.
    pub const QUATERNION_GYRO_LINEAR_ACCELERATION: StreamingSlots = Self::preset(&[
        LogicalCommand::GetTaredOrientationAsQuaternion,
        LogicalCommand::GetCorrectedGyroRate,
        LogicalCommand::GetCorrectedLinearAccelerationInGlobalSpace,
    ]);

    // Only used for the constants above, whose commands are known streamable.
    const fn preset(cmds: &[LogicalCommand]) -> Self {
        let mut slots = [StreamSlot::Unused; MAX_SLOTS];
        let mut i = 0;
        while i < cmds.len() && i < MAX_SLOTS {
            slots[i] = StreamSlot::Data(cmds[i]);
            i += 1;
        }
        StreamingSlots(slots)
    }

    /// Builds a slot set from up to eight slots; the rest are unused.
    pub fn new(slots: &[StreamSlot]) -> Result<Self, EncodeError> {
        if slots.len() > MAX_SLOTS {
            return Err(EncodeError::TooManySlots(slots.len()));
        }
        let mut all = [StreamSlot::Unused; MAX_SLOTS];
        for (dst, src) in all.iter_mut().zip(slots) {
            if let StreamSlot::Data(cmd) = src {
                StreamSlot::data(*cmd)?;
            }
            *dst = *src;
        }
        Ok(StreamingSlots(all))
    }

    /// Builds a slot set from the commands that fill it, in order.
    pub fn from_commands(cmds: &[LogicalCommand]) -> Result<Self, EncodeError> {
        if cmds.len() > MAX_SLOTS {
            return Err(EncodeError::TooManySlots(cmds.len()));
        }
        let mut all = [StreamSlot::Unused; MAX_SLOTS];
        for (dst, cmd) in all.iter_mut().zip(cmds) {
            *dst = StreamSlot::data(*cmd)?;
        }
        Ok(StreamingSlots(all))
    }

    /// Recovers the slot set from `SetStreamingSlots` arguments.
    pub fn from_args(args: &[Numeric]) -> Result<Self, EncodeError> {
        if args.len() != MAX_SLOTS {
            return Err(EncodeError::ArityMismatch {
                command: LogicalCommand::SetStreamingSlots,
                expected: MAX_SLOTS,
                got: args.len(),
            });
        }
        let mut all = [StreamSlot::Unused; MAX_SLOTS];
        for (index, (dst, arg)) in all.iter_mut().zip(args).enumerate() {
            *dst = match arg {
                Numeric::Integer(code) => StreamSlot::from_code(*code)?,
                Numeric::Float(_) => {
                    return Err(EncodeError::ArgumentType {
                        command: LogicalCommand::SetStreamingSlots,
                        index,
                    })
                }
            };
        }
        Ok(StreamingSlots(all))
    }

    /// Arguments for `SetStreamingSlots`.
    pub fn to_args(&self) -> [Numeric; MAX_SLOTS] {
        let mut args = [Numeric::Integer(UNUSED_SLOT_CODE as u32); MAX_SLOTS];
        for (arg, slot) in args.iter_mut().zip(self.0.iter()) {
            *arg = Numeric::Integer(slot.code() as u32);
        }
        args
    }

    pub fn slots(&self) -> &[StreamSlot; MAX_SLOTS] {
        &self.0
    }

    /// Commands in the used slots, in slot order.
    pub fn active(&self) -> impl Iterator<Item = LogicalCommand> + '_ {
        self.0.iter().filter_map(|slot| match slot {
            StreamSlot::Data(cmd) => Some(*cmd),
            StreamSlot::Unused => None,
        })
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Total number of comma-separated fields in one frame.
    pub fn field_count(&self) -> usize {
        self.0.iter().map(StreamSlot::field_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

impl fmt::Display for StreamingSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", slot.code())?;
        }
        Ok(())
    }
}

/// Streaming timing (`:82,<interval>,<duration>,<delay>`), all in microseconds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StreamingTiming {
    pub interval_us: u32,
    pub duration_us: u32,
    pub delay_us: u32,
}

impl StreamingTiming {
    pub const EVERY_100_MS: StreamingTiming =
        StreamingTiming::from_interval_us(timing::STREAM_INTERVAL_100_MS.as_micros() as u32);
    pub const EVERY_1000_MS: StreamingTiming =
        StreamingTiming::from_interval_us(timing::STREAM_INTERVAL_1000_MS.as_micros() as u32);
    pub const EVERY_5000_MS: StreamingTiming =
        StreamingTiming::from_interval_us(timing::STREAM_INTERVAL_5000_MS.as_micros() as u32);

    /// Interval-only timing, with zero duration and start delay.
    pub const fn from_interval_us(interval_us: u32) -> Self {
        StreamingTiming { interval_us, duration_us: 0, delay_us: 0 }
    }

    /// Interval-only timing; saturates at `u32::MAX` microseconds.
    pub fn from_interval(interval: Duration) -> Self {
        let us = u32::try_from(interval.as_micros()).unwrap_or(u32::MAX);
        Self::from_interval_us(us)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_micros(self.interval_us as u64)
    }

    /// Wait between `StartStreaming` and the first frame.
    pub fn start_delay(&self) -> Duration {
        Duration::from_micros(self.delay_us as u64)
    }

    /// Arguments for `SetStreamingTiming`.
    pub fn to_args(&self) -> [Numeric; 3] {
        [
            Numeric::Integer(self.interval_us),
            Numeric::Integer(self.duration_us),
            Numeric::Integer(self.delay_us),
        ]
    }

    /// Recovers the timing from `SetStreamingTiming` arguments.
    pub fn from_args(args: &[Numeric]) -> Result<Self, EncodeError> {
        let mut values = [0u32; 3];
        if args.len() != values.len() {
            return Err(EncodeError::ArityMismatch {
                command: LogicalCommand::SetStreamingTiming,
                expected: values.len(),
                got: args.len(),
            });
        }
        for (index, (dst, arg)) in values.iter_mut().zip(args).enumerate() {
            *dst = match arg {
                Numeric::Integer(v) => *v,
                Numeric::Float(_) => {
                    return Err(EncodeError::ArgumentType {
                        command: LogicalCommand::SetStreamingTiming,
                        index,
                    })
                }
            };
        }
        Ok(StreamingTiming {
            interval_us: values[0],
            duration_us: values[1],
            delay_us: values[2],
        })
    }
}

impl Default for StreamingTiming {
    fn default() -> Self {
        StreamingTiming::EVERY_100_MS
    }
}

/// Slot layout plus timing of an active streaming session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StreamingSlotConfig {
    pub slots: StreamingSlots,
    pub timing: StreamingTiming,
}

impl StreamingSlotConfig {
    pub fn interval(&self) -> Duration {
        self.timing.interval()
    }

    pub fn field_count(&self) -> usize {
        self.slots.field_count()
    }
}
