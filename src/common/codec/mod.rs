// src/common/codec/mod.rs

//! Pure request encoding and reply decoding. Nothing here touches a transport.

mod decode;
mod encode;
mod error;
mod stream;

pub use decode::{decode, split_fields, strip_line_ending};
pub use encode::{encode, WireRequest, MAX_REQUEST_LEN};
pub use error::{DecodeError, EncodeError};
pub use stream::{decode_frame, SlotReading, StreamingRecord};
