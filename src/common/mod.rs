// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod codec;
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod slots;
#[cfg(feature = "std")]
pub mod std_io;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{lookup, ArgKind, LogicalCommand, ResponseShape, WireTemplate};

// From codec/ (and its sub-modules via its own `pub use`)
pub use codec::{
    decode,            // From codec/decode.rs
    decode_frame,      // From codec/stream.rs
    encode,            // From codec/encode.rs
    DecodeError,       // From codec/error.rs
    EncodeError,       // From codec/error.rs
    SlotReading,       // From codec/stream.rs
    StreamingRecord,   // From codec/stream.rs
    WireRequest,       // From codec/encode.rs
};

// From error.rs
pub use error::ImuError;

// From hal_traits.rs
pub use hal_traits::{ImuInstant, ImuSerial, ImuTimer};
#[cfg(feature = "embedded-hal")]
pub use hal_traits::HalTimer;

// From slots.rs
pub use slots::{StreamSlot, StreamingSlotConfig, StreamingSlots, StreamingTiming, MAX_SLOTS};

// From std_io.rs
#[cfg(feature = "std")]
pub use std_io::StdInterface;

// From types.rs
pub use types::{
    AxisDirections, CalibrationMode, DecodedValue, EulerAngles, EulerDecompositionOrder, Numeric,
    Quaternion,
};
