//! Destination-display geometry: bounds and pointer coordinates.

use serde::{Deserialize, Serialize};

use crate::pointer::PointerError;

/// A pointer position in destination-screen pixel coordinates.
///
/// Two logical instances exist per controller: the *target* (set immediately
/// on new input) and the *rendered* position (eased toward the target every
/// animation tick). Both are always kept within the display bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
}

impl PointerState {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position. Used by convergence checks.
    pub fn distance_to(&self, other: PointerState) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// The pixel dimensions of whichever display renders the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBounds {
    width: f64,
    height: f64,
}

impl DisplayBounds {
    /// Creates display bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::InvalidBounds`] if either dimension is
    /// non-finite or not strictly positive.
    pub fn new(width: f64, height: f64) -> Result<Self, PointerError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(PointerError::InvalidBounds { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The centre of the display; a natural starting target.
    pub fn center(&self) -> PointerState {
        PointerState::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamps a position into `[0, width] × [0, height]`.
    pub fn clamp(&self, position: PointerState) -> PointerState {
        PointerState {
            x: position.x.clamp(0.0, self.width),
            y: position.y.clamp(0.0, self.height),
        }
    }

    /// Returns `true` if `position` lies within the bounds (inclusive).
    pub fn contains(&self, position: PointerState) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}
