//! Render sinks: where the pipeline's output goes.
//!
//! A presentation client paints the pointer; a controller shows a sensor
//! readout. [`RenderSink`] abstracts both so the runtime stays display-
//! agnostic. The crate ships a logging sink for the headless binary and a
//! recording sink for assertions in tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use spotlight_core::{PermissionState, PointerState};

/// Receives rendered pointer frames and diagnostic readouts.
#[cfg_attr(test, mockall::automock)]
pub trait RenderSink {
    /// Paints the pointer at its smoothed position. Called once per
    /// animation frame while the pointer is visible.
    fn render_pointer(&mut self, position: PointerState);

    /// Updates the diagnostic readout: the latest raw sensor fields (with
    /// missing axes as the string `"null"`) and the permission state.
    fn render_diagnostics(&mut self, fields: &BTreeMap<String, String>, permission: PermissionState);
}

/// A sink that renders to the log. Lets the headless demo binary show what
/// a graphical client would draw.
#[derive(Debug, Default)]
pub struct LogRenderSink;

impl RenderSink for LogRenderSink {
    fn render_pointer(&mut self, position: PointerState) {
        info!(x = position.x, y = position.y, "pointer");
    }

    fn render_diagnostics(&mut self, fields: &BTreeMap<String, String>, permission: PermissionState) {
        info!(?fields, ?permission, "sensor readout");
    }
}

/// One recorded call on a [`RecordingRenderSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Pointer(PointerState),
    Diagnostics {
        fields: BTreeMap<String, String>,
        permission: PermissionState,
    },
}

/// A sink that records every call for later inspection.
///
/// The runtime consumes its sink by value, so the recording lives behind a
/// shared handle: clone the sink, hand one copy to the runtime, and read
/// [`Self::events`] from the other after shutdown.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderSink {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far.
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().expect("render recording poisoned").clone()
    }

    /// The positions of all recorded pointer frames, in order.
    pub fn pointer_frames(&self) -> Vec<PointerState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Pointer(position) => Some(position),
                RenderEvent::Diagnostics { .. } => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingRenderSink {
    fn render_pointer(&mut self, position: PointerState) {
        self.events
            .lock()
            .expect("render recording poisoned")
            .push(RenderEvent::Pointer(position));
    }

    fn render_diagnostics(&mut self, fields: &BTreeMap<String, String>, permission: PermissionState) {
        self.events
            .lock()
            .expect("render recording poisoned")
            .push(RenderEvent::Diagnostics {
                fields: fields.clone(),
                permission,
            });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
