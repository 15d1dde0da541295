//! Motion-to-pointer mapping.
//!
//! The mapper converts a calibrated sensor delta into a new bounded target
//! position. It is deliberately an *additive accumulator* over the current
//! target, not an absolute mapping of tilt angle to position: holding a tilt
//! keeps moving the pointer until it reaches a display edge, where the clamp
//! pins it until the tilt reverses.

use crate::pointer::calibration::CalibrationReference;
use crate::pointer::geometry::{DisplayBounds, PointerState};
use crate::sensor::{AccelerationSample, OrientationSample};

/// Fixed tilt-to-pixel gain in pixels per degree per sample.
pub const SENSITIVITY: f64 = 2.0;

/// Stateless mapping rule from sensor deltas to target positions.
///
/// The mapper holds only the display bounds and the gain; the current target
/// belongs to the session that owns the pipeline. Each step takes the
/// current target and returns the next one, clamped to the bounds.
#[derive(Debug, Clone, Copy)]
pub struct PointerMapper {
    bounds: DisplayBounds,
    sensitivity: f64,
}

impl PointerMapper {
    /// Creates a mapper with the design-value gain of [`SENSITIVITY`].
    pub fn new(bounds: DisplayBounds) -> Self {
        Self {
            bounds,
            sensitivity: SENSITIVITY,
        }
    }

    /// Overrides the gain. Mostly useful in tests.
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn bounds(&self) -> DisplayBounds {
        self.bounds
    }

    /// Advances the target by one calibrated orientation sample.
    ///
    /// Sign convention: increasing `beta` (tilting forward) moves the
    /// pointer downward; increasing `gamma` (rolling right) moves it right.
    /// A sample with a null tilt or roll carries no data and produces no
    /// movement, as does the absence of a calibration reference.
    pub fn step_orientation(
        &self,
        target: PointerState,
        sample: &OrientationSample,
        reference: Option<&CalibrationReference>,
    ) -> PointerState {
        let Some(reference) = reference else {
            // No calibration reference ⇒ no movement.
            return target;
        };
        let (Some(beta), Some(gamma)) = (sample.beta, sample.gamma) else {
            return target;
        };

        let calibrated_tilt = beta - reference.beta;
        let calibrated_roll = gamma - reference.gamma;
        self.bounds.clamp(PointerState {
            x: target.x + calibrated_roll * self.sensitivity,
            y: target.y + calibrated_tilt * self.sensitivity,
        })
    }

    /// Advances the target by one raw acceleration sample.
    ///
    /// The legacy variant from before orientation calibration existed: the
    /// clamp-and-accumulate rule applied directly to the raw components,
    /// with no calibration step. Device acceleration `y` points up-screen,
    /// so it is negated to keep "push forward" moving the pointer up.
    pub fn step_acceleration(
        &self,
        target: PointerState,
        sample: &AccelerationSample,
    ) -> PointerState {
        let (Some(ax), Some(ay)) = (sample.x, sample.y) else {
            return target;
        };

        self.bounds.clamp(PointerState {
            x: target.x + ax * self.sensitivity,
            y: target.y - ay * self.sensitivity,
        })
    }
}
