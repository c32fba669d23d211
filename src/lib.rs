// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless testing or std adapters are wanted

pub mod common;
pub mod driver;
pub mod session;

// Re-export key types for convenience
pub use common::{DecodedValue, ImuError, LogicalCommand};
pub use driver::{DriverConfig, ImuDriver, ImuSample};
pub use session::{ImuPublisher, ImuSession, SessionState};
