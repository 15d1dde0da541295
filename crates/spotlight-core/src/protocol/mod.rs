//! The JSON wire protocol spoken over the relay.

pub mod messages;

pub use messages::{PointerAction, SyncMessage};
