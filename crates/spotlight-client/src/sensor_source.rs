//! Motion sensor sources.
//!
//! [`SensorSource`] is the seam between the session pipeline and whatever
//! actually produces motion readings. The trait hands out a channel rather
//! than single readings because sensors are push-driven: a subscription
//! exists, delivers at its own cadence, and ends when the receiver is
//! dropped. Rate limiting is *not* the source's job — the session's sample
//! gate handles that downstream.
//!
//! The only implementation here is [`SyntheticSensor`], which replays a
//! scripted sequence on a timer. It drives the headless demo binary and the
//! end-to-end tests; a real device integration would implement the same
//! trait over its platform API.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use spotlight_core::{MotionSample, PermissionState};

/// Capacity of a subscription channel. Sensor events are only meaningful
/// fresh, so a small buffer that drops backlog on the floor is correct.
const SUBSCRIPTION_DEPTH: usize = 16;

/// A source of raw motion samples.
pub trait SensorSource {
    /// The permission outcome for this source. Checked once at startup and
    /// after each role change; a non-sampling state means the pipeline runs
    /// without sensor input.
    fn permission(&self) -> PermissionState;

    /// Starts a new subscription. Samples flow until the receiver is
    /// dropped, which cancels the subscription.
    fn subscribe(&mut self) -> mpsc::Receiver<MotionSample>;
}

/// A scripted sensor that emits a fixed sample sequence on a timer.
#[derive(Debug, Clone)]
pub struct SyntheticSensor {
    permission: PermissionState,
    script: Vec<MotionSample>,
    interval: Duration,
    repeat: bool,
}

impl SyntheticSensor {
    /// Creates a sensor that plays `script` once, one sample per `interval`,
    /// with permission granted.
    pub fn new(script: Vec<MotionSample>, interval: Duration) -> Self {
        Self {
            permission: PermissionState::Granted,
            script,
            interval,
            repeat: false,
        }
    }

    /// Overrides the permission outcome, e.g. to exercise the denied path.
    pub fn with_permission(mut self, permission: PermissionState) -> Self {
        self.permission = permission;
        self
    }

    /// Replays the script forever instead of once.
    pub fn looping(mut self) -> Self {
        self.repeat = true;
        self
    }
}

impl SensorSource for SyntheticSensor {
    fn permission(&self) -> PermissionState {
        self.permission
    }

    fn subscribe(&mut self) -> mpsc::Receiver<MotionSample> {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_DEPTH);
        let script = self.script.clone();
        let interval = self.interval;
        let repeat = self.repeat;

        tokio::spawn(async move {
            loop {
                for sample in &script {
                    tokio::time::sleep(interval).await;
                    if tx.send(*sample).await.is_err() {
                        // Receiver dropped: subscription cancelled.
                        debug!("synthetic sensor subscription ended");
                        return;
                    }
                }
                if !repeat {
                    break;
                }
            }
            debug!("synthetic sensor script exhausted");
        });

        rx
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
