//! The client event loop.
//!
//! [`run`] wires a [`PointerSession`] to its three peripherals — the relay
//! link, a sensor source, and a render sink — and multiplexes them in a
//! single task. One task means no locking around the session: every
//! transition happens in one place, in event order.
//!
//! Event sources:
//!
//! - **Commands** — role toggles, visibility changes, shutdown. These come
//!   from whatever UI drives the client (the demo binary scripts them).
//! - **Sensor samples** — only subscribed while the session wants them
//!   (controller role, permission allowing).
//! - **Inbound relay messages** — applied in presentation role. A closed
//!   link ends the loop; there is no automatic reconnect.
//! - **Animation frames** — a fixed-period tick that eases the rendered
//!   pointer toward the target.

use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use spotlight_core::MotionSample;

use crate::link::RelayLink;
use crate::render::RenderSink;
use crate::sensor_source::SensorSource;
use crate::session::{InboundOutcome, PointerSession};

/// Display-refresh period for the animation tick (~60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// An instruction from the UI driving this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Switch between presentation and controller roles.
    ToggleRole,
    /// Show or hide the pointer.
    SetVisibility(bool),
    /// End the event loop.
    Shutdown,
}

/// Runs the client event loop until shutdown or link closure.
///
/// Consumes the session and its peripherals; the caller observes progress
/// through the render sink (see
/// [`RecordingRenderSink`](crate::render::RecordingRenderSink)) and by
/// closing the command channel to stop the loop.
///
/// # Errors
///
/// Returns an error if an outbound send fails, i.e. the link broke mid-write.
pub async fn run<S, R>(
    mut session: PointerSession,
    link: RelayLink,
    mut sensor: S,
    mut render: R,
    mut commands: mpsc::Receiver<SessionCommand>,
) -> anyhow::Result<()>
where
    S: SensorSource,
    R: RenderSink,
{
    let (mut sender, mut receiver) = link.split();
    session.set_permission(sensor.permission());
    info!(role = ?session.role(), permission = ?session.permission(), "session started");

    let (mut frames, mut ticker) = spawn_animation_ticker(FRAME_INTERVAL);

    // The sensor subscription and animation tick are (re)established at the
    // top of the loop rather than inside the select arms, so the arm futures
    // hold the only borrows of `samples` and `frames`.
    let mut samples: Option<mpsc::Receiver<MotionSample>> = None;
    let mut sensor_dirty = true;
    let mut ticker_dirty = false;

    loop {
        if sensor_dirty {
            sensor_dirty = false;
            samples = if session.wants_sensor() {
                debug!("subscribing to sensor");
                Some(sensor.subscribe())
            } else {
                None
            };
        }
        if ticker_dirty {
            ticker_dirty = false;
            // Tear down and restart the animation tick on role change so no
            // orphaned cycle from the previous role survives.
            let (new_frames, new_ticker) = spawn_animation_ticker(FRAME_INTERVAL);
            frames = new_frames;
            ticker = new_ticker;
        }

        tokio::select! {
            maybe_command = commands.recv() => {
                let Some(command) = maybe_command else {
                    info!("command source closed; shutting down");
                    break;
                };
                match command {
                    SessionCommand::ToggleRole => {
                        session.toggle_role();
                        sensor_dirty = true;
                        ticker_dirty = true;
                    }
                    SessionCommand::SetVisibility(show) => {
                        if let Some(message) = session.set_visibility(show) {
                            sender
                                .send(&message)
                                .await
                                .context("failed to publish visibility change")?;
                        }
                    }
                    SessionCommand::Shutdown => {
                        info!("shutdown requested");
                        break;
                    }
                }
            }

            sample = next_sample(&mut samples) => {
                render.render_diagnostics(&sample.diagnostic(), session.permission());
                if let Some(message) = session.handle_sensor(&sample, Instant::now()) {
                    sender
                        .send(&message)
                        .await
                        .context("failed to publish position update")?;
                }
            }

            inbound = receiver.recv() => {
                match inbound {
                    Some(message) => {
                        let outcome = session.handle_inbound(&message);
                        if outcome != InboundOutcome::Ignored {
                            if let Some(fields) = message
                                .orientation_data
                                .as_ref()
                                .or(message.motion_data.as_ref())
                            {
                                render.render_diagnostics(fields, session.permission());
                            }
                        }
                    }
                    None => {
                        warn!("relay link closed; ending session");
                        break;
                    }
                }
            }

            frame = frames.recv() => {
                if frame.is_none() {
                    warn!("animation ticker stopped unexpectedly");
                    break;
                }
                render_frame(&mut session, &mut render);
            }
        }
    }

    drop(ticker);
    info!("session ended");
    Ok(())
}

/// Advances the animator one frame and paints the pointer if it is visible.
fn render_frame<R: RenderSink>(session: &mut PointerSession, render: &mut R) {
    let rendered = session.animation_tick();
    if session.visible() {
        render.render_pointer(rendered);
    }
}

/// Awaits the next sample from an optional subscription.
///
/// With no subscription this pends forever, which disables the select arm.
/// An exhausted subscription is downgraded to "no subscription" in place, so
/// the arm never busy-loops on a closed channel.
async fn next_sample(samples: &mut Option<mpsc::Receiver<MotionSample>>) -> MotionSample {
    loop {
        match samples {
            Some(receiver) => match receiver.recv().await {
                Some(sample) => return sample,
                None => {
                    debug!("sensor subscription ended");
                    *samples = None;
                }
            },
            None => std::future::pending::<()>().await,
        }
    }
}

/// Spawns the fixed-period animation tick.
///
/// The channel has capacity 1 and the ticker skips missed periods, so a slow
/// consumer collapses backlogged frames instead of replaying them. Dropping
/// the returned handle stops the ticker.
fn spawn_animation_ticker(period: Duration) -> (mpsc::Receiver<()>, TickerHandle) {
    let (tx, rx) = mpsc::channel(1);
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    (rx, TickerHandle { task })
}

/// Owns the ticker task; dropping it aborts the task.
struct TickerHandle {
    task: JoinHandle<()>,
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
