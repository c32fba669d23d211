// src/session/mod.rs

//! Blocking request/response and streaming session over an [`ImuSerial`] port.

mod config;
mod io_helpers;
mod publisher;
mod state;
mod streaming;
mod transaction;

#[cfg(test)]
pub(crate) mod mock;

pub use config::SessionConfig;
pub use publisher::ImuPublisher;
pub use state::{Reply, SessionState, Staged, StateMachine};
pub use streaming::StreamStats;

use crate::common::{
    hal_traits::{ImuInstant, ImuSerial, ImuTimer},
    slots::{StreamingSlots, StreamingTiming},
};
use core::fmt::Debug;

/// Longest line the session will buffer, reply or streaming frame.
pub const MAX_LINE_LEN: usize = 1024;

/// Owns the transport and enforces the one-request-in-flight protocol.
#[derive(Debug)]
pub struct ImuSession<IF>
where
    IF: ImuSerial + ImuTimer,
    IF::Error: Debug,
    IF::Instant: ImuInstant,
{
    interface: IF,
    machine: StateMachine,
    config: SessionConfig,
}

impl<IF> ImuSession<IF>
where
    IF: ImuSerial + ImuTimer,
    IF::Error: Debug,
    IF::Instant: ImuInstant,
{
    pub fn new(interface: IF) -> Self {
        Self::with_config(interface, SessionConfig::default())
    }

    pub fn with_config(interface: IF, config: SessionConfig) -> Self {
        ImuSession {
            interface,
            machine: StateMachine::new(),
            config,
        }
    }

    pub fn state(&self) -> &SessionState {
        self.machine.state()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Slots recorded from the last successful `SetStreamingSlots`.
    pub fn configured_slots(&self) -> Option<&StreamingSlots> {
        self.machine.configured_slots()
    }

    /// Timing recorded from the last successful `SetStreamingTiming`.
    pub fn configured_timing(&self) -> Option<&StreamingTiming> {
        self.machine.configured_timing()
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    /// Gives the transport back. Any streaming on the device is left running.
    pub fn release(self) -> IF {
        self.interface
    }
}
