//! Wall-clock interval gates for rate limiting.
//!
//! The client pipeline runs three independent cadences that must not be
//! conflated:
//!
//! - **Sampling** (32 ms floor) — how often raw sensor input is processed,
//!   bounding CPU cost and denoising input before the calibration math runs.
//! - **Publishing** (100 ms floor) — how often the network is used for
//!   position updates.
//! - **Rendering** — the display-refresh tick, which is owned by the
//!   smoothing animator and never throttled here.
//!
//! An [`IntervalGate`] is the primitive behind the first two: it compares
//! "now" against the last time it fired and early-returns `false` if the
//! minimum interval has not elapsed. The caller supplies the `Instant`, so
//! tests can drive the gate with a synthetic clock.

use std::time::{Duration, Instant};

/// Minimum interval between processed raw sensor events (≈30 Hz).
pub const SAMPLE_FLOOR: Duration = Duration::from_millis(32);

/// Minimum interval between outbound position messages.
pub const PUBLISH_FLOOR: Duration = Duration::from_millis(100);

/// A minimum-interval gate that drops events arriving too soon after the
/// last accepted one.
///
/// The first event always fires. Rejected events do not advance the last
/// fired timestamp, so a burst of rejected events cannot starve the gate.
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use spotlight_core::IntervalGate;
///
/// let mut gate = IntervalGate::new(Duration::from_millis(100));
/// let t0 = Instant::now();
/// assert!(gate.try_fire(t0));
/// assert!(!gate.try_fire(t0 + Duration::from_millis(50)));
/// assert!(gate.try_fire(t0 + Duration::from_millis(100)));
/// ```
#[derive(Debug, Clone)]
pub struct IntervalGate {
    min_interval: Duration,
    last_fired: Option<Instant>,
}

impl IntervalGate {
    /// Creates a gate that fires at most once per `min_interval`.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_fired: None,
        }
    }

    /// Attempts to fire the gate at time `now`.
    ///
    /// Returns `true` (and records `now` as the last fired time) if the gate
    /// has never fired or at least `min_interval` has elapsed since it last
    /// fired; returns `false` otherwise.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    /// Clears the last-fired timestamp so the next event fires immediately.
    ///
    /// Used when the owning state is torn down (role change) so a fresh
    /// subscription is not penalised by the previous one's timing.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }

    /// The configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
