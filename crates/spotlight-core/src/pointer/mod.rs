//! The pointer pipeline: geometry, calibration, mapping, and smoothing.
//!
//! Pure logic with no I/O. The pipeline turns noisy, high-frequency sensor
//! samples into a smooth, bounded pointer position:
//!
//! ```text
//! OrientationSample ──► Calibrator ──► PointerMapper ──► target
//!                                                          │
//!                                    SmoothingAnimator ◄───┘  (per frame)
//!                                          │
//!                                       rendered
//! ```

pub mod calibration;
pub mod geometry;
pub mod mapper;
pub mod smoothing;

use thiserror::Error;

/// Errors raised when constructing pointer pipeline components.
#[derive(Debug, Error, PartialEq)]
pub enum PointerError {
    /// Display bounds must be finite and strictly positive.
    #[error("invalid display bounds: {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },

    /// The easing factor must lie strictly between 0 and 1.
    #[error("ease factor {0} is outside (0, 1)")]
    EaseOutOfRange(f64),
}
