//! spotlight-relay library crate.
//!
//! A stateless WebSocket broadcast relay: every message received from one
//! link is validated as a [`spotlight_core::SyncMessage`] and then forwarded,
//! verbatim, to every other currently-open link. The relay interprets
//! nothing, stores nothing, and orders nothing beyond the per-link FIFO the
//! transport already gives it. A peer connecting after a message was sent
//! never sees it — there is no replay and no last-value cache.
//!
//! ```text
//! controller ──ws──►┐
//!                   │  relay (connection set, blind fan-out)
//! presentation ◄─ws─┘
//! ```
//!
//! The binary entry point lives in `main.rs`; the library exposes
//! [`Relay`] so integration tests can bind an ephemeral port and drive the
//! relay in-process.

pub mod config;
pub mod relay;

pub use config::{ConfigError, RelayConfig};
pub use relay::{Relay, RelayError};
