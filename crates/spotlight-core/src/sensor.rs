//! Raw motion sensor sample types and permission state.
//!
//! Device sensor APIs deliver readings at hardware-driven frequency and make
//! no promise that every field is populated: a phone lying on a desk may
//! report `null` for one or more axes, and some platforms never populate
//! `alpha` at all. Fields are therefore modelled as `Option<f64>` and a
//! missing value is surfaced in diagnostics as the [`NULL_SENTINEL`] string
//! rather than ever causing a mapping failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel rendered into diagnostic snapshots for a missing sensor field.
pub const NULL_SENTINEL: &str = "null";

/// Whether the sensor API requires — and has received — an explicit user grant.
///
/// Gates whether the sampler subscribes at all. A denied or unsupported
/// sensor is a silent degraded mode: the client stays fully interactive but
/// the mapper never receives samples, so the pointer simply does not move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// Not yet determined (e.g. the grant prompt has not been shown).
    #[default]
    Unknown,
    /// The user granted sensor access.
    Granted,
    /// The user denied sensor access, or the API reported failure.
    Denied,
    /// The platform hands out sensor events without an explicit grant.
    NotRequired,
}

impl PermissionState {
    /// Returns `true` if the sampler is allowed to subscribe.
    pub fn allows_sampling(self) -> bool {
        matches!(self, PermissionState::Granted | PermissionState::NotRequired)
    }
}

/// An orientation reading: device rotation in degrees.
///
/// `beta` is front-to-back tilt and `gamma` is left-to-right roll — the two
/// axes the pointer mapper consumes. `alpha` (compass heading) is carried
/// for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationSample {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl OrientationSample {
    /// Convenience constructor for a fully-populated reading.
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    /// Diagnostic snapshot: each axis as a stringified number, with missing
    /// fields rendered as [`NULL_SENTINEL`].
    pub fn diagnostic(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("alpha".to_string(), stringify_axis(self.alpha));
        fields.insert("beta".to_string(), stringify_axis(self.beta));
        fields.insert("gamma".to_string(), stringify_axis(self.gamma));
        fields
    }
}

/// A linear-acceleration reading in m/s² (gravity included).
///
/// Used by the legacy acceleration-based mapping variant, which predates the
/// orientation calibration step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccelerationSample {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl AccelerationSample {
    /// Convenience constructor for a fully-populated reading.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// Diagnostic snapshot in the same stringified form as
    /// [`OrientationSample::diagnostic`].
    pub fn diagnostic(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("x".to_string(), stringify_axis(self.x));
        fields.insert("y".to_string(), stringify_axis(self.y));
        fields.insert("z".to_string(), stringify_axis(self.z));
        fields
    }
}

/// A single raw sensor reading, in whichever form the device produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSample {
    Orientation(OrientationSample),
    Acceleration(AccelerationSample),
}

impl MotionSample {
    /// Diagnostic snapshot of this sample's fields.
    pub fn diagnostic(&self) -> BTreeMap<String, String> {
        match self {
            MotionSample::Orientation(o) => o.diagnostic(),
            MotionSample::Acceleration(a) => a.diagnostic(),
        }
    }

    /// Returns the orientation form of this sample, if it is one.
    pub fn as_orientation(&self) -> Option<&OrientationSample> {
        match self {
            MotionSample::Orientation(o) => Some(o),
            MotionSample::Acceleration(_) => None,
        }
    }
}

/// Formats one axis value for a diagnostic snapshot.
///
/// Two decimal places is plenty for a human-readable readout and keeps the
/// forwarded payload small.
fn stringify_axis(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => NULL_SENTINEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_gating() {
        assert!(PermissionState::Granted.allows_sampling());
        assert!(PermissionState::NotRequired.allows_sampling());
        assert!(!PermissionState::Denied.allows_sampling());
        assert!(!PermissionState::Unknown.allows_sampling());
    }

    #[test]
    fn test_default_permission_is_unknown() {
        assert_eq!(PermissionState::default(), PermissionState::Unknown);
    }

    #[test]
    fn test_orientation_diagnostic_stringifies_values() {
        let sample = OrientationSample::new(180.0, 12.345, -3.5);
        let fields = sample.diagnostic();
        assert_eq!(fields["alpha"], "180.00");
        assert_eq!(fields["beta"], "12.35");
        assert_eq!(fields["gamma"], "-3.50");
    }

    #[test]
    fn test_orientation_diagnostic_uses_null_sentinel_for_missing_fields() {
        // A phone flat on a desk can report null axes; the diagnostic view
        // must show a sentinel instead of failing.
        let sample = OrientationSample {
            alpha: None,
            beta: Some(1.0),
            gamma: None,
        };
        let fields = sample.diagnostic();
        assert_eq!(fields["alpha"], NULL_SENTINEL);
        assert_eq!(fields["beta"], "1.00");
        assert_eq!(fields["gamma"], NULL_SENTINEL);
    }

    #[test]
    fn test_acceleration_diagnostic_fields() {
        let sample = AccelerationSample::new(0.1, -9.81, 0.0);
        let fields = sample.diagnostic();
        assert_eq!(fields["x"], "0.10");
        assert_eq!(fields["y"], "-9.81");
        assert_eq!(fields["z"], "0.00");
    }

    #[test]
    fn test_as_orientation_only_matches_orientation_samples() {
        let o = MotionSample::Orientation(OrientationSample::new(0.0, 1.0, 2.0));
        let a = MotionSample::Acceleration(AccelerationSample::new(0.0, 0.0, 0.0));
        assert!(o.as_orientation().is_some());
        assert!(a.as_orientation().is_none());
    }
}
