//! # spotlight-core
//!
//! Shared library for the Spotlight remote pointer containing the wire
//! protocol types and the client-side pointer pipeline: calibration,
//! motion-to-pointer mapping, smoothing, and rate limiting.
//!
//! This crate is used by both the relay and the client application.
//! It has zero dependencies on sockets, async runtimes, or UI frameworks.
//!
//! # Architecture overview
//!
//! Spotlight lets one device (the *controller*, typically a phone) steer a
//! spotlight-style pointer rendered on a second device (the *presentation*
//! display). Motion samples from the controller are calibrated against a
//! one-shot orientation baseline, mapped into bounded screen coordinates,
//! and relayed as small JSON messages through a stateless broadcast relay.
//!
//! This crate defines:
//!
//! - **`protocol`** – The JSON messages that travel over the relay. A single
//!   flat object with optional, additive fields; receivers apply only the
//!   fields they recognise.
//!
//! - **`pointer`** – Pure pipeline logic with no I/O: display geometry and
//!   clamping, the tilt-to-pixel mapper, the one-shot calibration engine,
//!   and the eased smoothing animator.
//!
//! - **`gate`** – Wall-clock interval gates used to throttle raw sensor
//!   input and outbound network publishes independently of each other.
//!
//! - **`role`** / **`sensor`** – The local controller/presentation role and
//!   the raw motion sample types (with nullable fields, as delivered by
//!   real device sensor APIs).

pub mod gate;
pub mod pointer;
pub mod protocol;
pub mod role;
pub mod sensor;

// Re-export the most-used types at the crate root so callers can write
// `spotlight_core::SyncMessage` instead of the full module path.
pub use gate::{IntervalGate, PUBLISH_FLOOR, SAMPLE_FLOOR};
pub use pointer::calibration::{CalibrationReference, Calibrator};
pub use pointer::geometry::{DisplayBounds, PointerState};
pub use pointer::mapper::{PointerMapper, SENSITIVITY};
pub use pointer::smoothing::{SmoothingAnimator, EASE};
pub use pointer::PointerError;
pub use protocol::messages::{PointerAction, SyncMessage};
pub use role::Role;
pub use sensor::{AccelerationSample, MotionSample, OrientationSample, PermissionState};
