//! Spotlight client pipeline.
//!
//! Everything a client needs to take part in a pointer session: the
//! [`PointerSession`] state machine, the [`RelayLink`] WebSocket connection,
//! the [`SensorSource`] and [`RenderSink`] seams, and the [`runtime`] event
//! loop that ties them together.
//!
//! A client plays one of two roles against the relay (and can switch at any
//! time):
//!
//! - **Presentation** — renders the pointer, applying position and
//!   visibility updates received from the relay.
//! - **Controller** — maps motion sensor input into pointer movement and
//!   publishes it.
//!
//! The crate is display-agnostic: the demo binary renders to the log, and a
//! graphical frontend would supply its own [`RenderSink`] and drive the
//! runtime with [`runtime::SessionCommand`]s.

pub mod link;
pub mod render;
pub mod runtime;
pub mod sensor_source;
pub mod session;

pub use link::{LinkError, LinkReceiver, LinkSender, RelayLink};
pub use render::{LogRenderSink, RecordingRenderSink, RenderEvent, RenderSink};
pub use runtime::{run, SessionCommand, FRAME_INTERVAL};
pub use sensor_source::{SensorSource, SyntheticSensor};
pub use session::{InboundOutcome, PointerSession, SessionConfig, SessionSnapshot};
