//! One-shot orientation calibration.
//!
//! Device orientation is an absolute quantity: a phone held at a comfortable
//! angle already reports a large `beta`. To make that resting pose map to
//! "no movement", the calibrator captures a single reference sample at the
//! moment pointer visibility is turned on, and the mapper zeroes every later
//! sample against it.
//!
//! The capture is armed exactly once per visibility-on transition and is
//! consumed by the first orientation sample that arrives afterwards — valid
//! or not. A sample with a null `beta` or `gamma` consumes the attempt and
//! leaves the previous (or absent) reference in place. There is no timeout
//! and no retry: with no reference, the mapper produces no movement until
//! visibility is toggled again.

use tracing::debug;

use crate::sensor::OrientationSample;

/// The captured orientation baseline used to zero future deltas.
///
/// Only `beta` (tilt) and `gamma` (roll) participate in mapping; a reference
/// exists only when the captured sample had both fields populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationReference {
    pub beta: f64,
    pub gamma: f64,
}

/// Owns the at-most-one active [`CalibrationReference`] per controller
/// session and the armed/disarmed capture state.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    reference: Option<CalibrationReference>,
    armed: bool,
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot capture. Called on every visibility-on transition;
    /// the next orientation sample consumes it.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Whether a capture is currently pending.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Offers an orientation sample to an armed calibrator.
    ///
    /// Returns `true` if a new reference was stored. If the calibrator is
    /// not armed the sample is ignored. If the sample has a null tilt or
    /// roll field the attempt is consumed without touching the existing
    /// reference — a silent failure, by contract.
    pub fn observe(&mut self, sample: &OrientationSample) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;

        match (sample.beta, sample.gamma) {
            (Some(beta), Some(gamma)) => {
                debug!(beta, gamma, "calibration reference captured");
                self.reference = Some(CalibrationReference { beta, gamma });
                true
            }
            _ => {
                debug!("calibration sample had null tilt/roll; reference unchanged");
                false
            }
        }
    }

    /// The active reference, if any.
    pub fn reference(&self) -> Option<&CalibrationReference> {
        self.reference.as_ref()
    }

    /// Discards the reference and any pending capture. Called when the
    /// client leaves the controller role.
    pub fn reset(&mut self) {
        self.reference = None;
        self.armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_calibrator_ignores_samples() {
        let mut cal = Calibrator::new();
        assert!(!cal.observe(&OrientationSample::new(0.0, 10.0, 5.0)));
        assert!(cal.reference().is_none());
    }

    #[test]
    fn test_armed_capture_stores_reference() {
        let mut cal = Calibrator::new();
        cal.arm();
        assert!(cal.observe(&OrientationSample::new(0.0, 10.0, 5.0)));
        let reference = cal.reference().unwrap();
        assert_eq!(reference.beta, 10.0);
        assert_eq!(reference.gamma, 5.0);
    }

    #[test]
    fn test_capture_is_one_shot() {
        let mut cal = Calibrator::new();
        cal.arm();
        assert!(cal.observe(&OrientationSample::new(0.0, 10.0, 5.0)));
        // A second sample must not overwrite the reference.
        assert!(!cal.observe(&OrientationSample::new(0.0, 99.0, 99.0)));
        assert_eq!(cal.reference().unwrap().beta, 10.0);
    }

    #[test]
    fn test_null_fields_consume_attempt_and_keep_previous_reference() {
        let mut cal = Calibrator::new();
        cal.arm();
        cal.observe(&OrientationSample::new(0.0, 10.0, 5.0));

        // Re-arm; the next sample has a null gamma, so the attempt fails
        // silently and the old reference survives.
        cal.arm();
        let bad = OrientationSample {
            alpha: None,
            beta: Some(20.0),
            gamma: None,
        };
        assert!(!cal.observe(&bad));
        assert!(!cal.is_armed(), "failed capture still consumes the attempt");
        assert_eq!(cal.reference().unwrap().beta, 10.0);
    }

    #[test]
    fn test_null_fields_with_no_previous_reference_leaves_none() {
        let mut cal = Calibrator::new();
        cal.arm();
        let bad = OrientationSample {
            alpha: Some(0.0),
            beta: None,
            gamma: Some(1.0),
        };
        assert!(!cal.observe(&bad));
        assert!(cal.reference().is_none());
    }

    #[test]
    fn test_rearming_overwrites_reference() {
        // At most one reference is active at a time: each successful capture
        // replaces the previous one.
        let mut cal = Calibrator::new();
        cal.arm();
        cal.observe(&OrientationSample::new(0.0, 10.0, 5.0));
        cal.arm();
        cal.observe(&OrientationSample::new(0.0, -4.0, 2.5));
        assert_eq!(
            cal.reference(),
            Some(&CalibrationReference {
                beta: -4.0,
                gamma: 2.5
            })
        );
    }

    #[test]
    fn test_reset_discards_reference_and_pending_capture() {
        let mut cal = Calibrator::new();
        cal.arm();
        cal.observe(&OrientationSample::new(0.0, 10.0, 5.0));
        cal.arm();
        cal.reset();
        assert!(cal.reference().is_none());
        assert!(!cal.is_armed());
    }
}
