//! Connectivity manager core for the tidemark firmware.
//!
//! Owns the station/access-point lifecycle as a pure state machine: radio
//! work and hook delivery are emitted as actions for the firmware runtime to
//! execute, so nothing in this package blocks or touches hardware. Drive it
//! with [`events::ConnEvent`]s carrying millisecond timestamps and execute
//! the [`types::ConnAction`]s it returns, in order.

#![cfg_attr(not(test), no_std)]

pub mod backoff;
pub mod engine;
pub mod events;
mod machine;
pub mod snapshot;
pub mod types;


pub use backoff::{BackoffPolicy, ManagerConfig};
pub use engine::{ConnApplyResult, ConnEngine};
pub use events::ConnEvent;
pub use snapshot::{publish_link_status, read_link_status, ConnSnapshot, LinkStatus};
pub use types::{ActionBuffer, ApplyStatus, ConnAction, ConnStateId, StationCredentials};
