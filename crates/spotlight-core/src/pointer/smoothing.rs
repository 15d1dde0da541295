//! The smoothing animator: eases the rendered position toward the target.
//!
//! Input arrival is noisy and irregular (sensor bursts, network jitter); the
//! rendered pointer must move at a steady visual cadence regardless. Every
//! display-refresh tick the animator closes a fixed fraction of the gap:
//!
//! ```text
//! rendered += (target - rendered) * EASE
//! ```
//!
//! Smaller easing factors produce smoother but laggier motion. The animator
//! runs unconditionally once started, in either role, so a presentation
//! client's remotely-received targets animate smoothly rather than snapping.
//! The rendered trajectory is continuous except when [`SmoothingAnimator::snap_to`]
//! is called for a deliberate discontinuity (first calibration, remote
//! override).

use crate::pointer::geometry::PointerState;
use crate::pointer::PointerError;

/// Design-value damping factor.
pub const EASE: f64 = 0.15;

/// Continuously eases a rendered position toward the latest target.
#[derive(Debug, Clone)]
pub struct SmoothingAnimator {
    rendered: PointerState,
    ease: f64,
}

impl SmoothingAnimator {
    /// Creates an animator starting at `initial` with the given easing factor.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::EaseOutOfRange`] unless `0 < ease < 1`.
    pub fn new(initial: PointerState, ease: f64) -> Result<Self, PointerError> {
        if !ease.is_finite() || ease <= 0.0 || ease >= 1.0 {
            return Err(PointerError::EaseOutOfRange(ease));
        }
        Ok(Self {
            rendered: initial,
            ease,
        })
    }

    /// The current rendered position.
    pub fn rendered(&self) -> PointerState {
        self.rendered
    }

    /// Advances one display-refresh tick toward `target` and returns the new
    /// rendered position.
    pub fn tick(&mut self, target: PointerState) -> PointerState {
        self.rendered.x += (target.x - self.rendered.x) * self.ease;
        self.rendered.y += (target.y - self.rendered.y) * self.ease;
        self.rendered
    }

    /// Jumps the rendered position directly to `position`.
    ///
    /// The only sanctioned discontinuities: the first calibration and a
    /// remote override.
    pub fn snap_to(&mut self, position: PointerState) {
        self.rendered = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_ease_outside_unit_interval() {
        let p = PointerState::default();
        assert!(matches!(
            SmoothingAnimator::new(p, 0.0),
            Err(PointerError::EaseOutOfRange(_))
        ));
        assert!(SmoothingAnimator::new(p, 1.0).is_err());
        assert!(SmoothingAnimator::new(p, -0.5).is_err());
        assert!(SmoothingAnimator::new(p, f64::NAN).is_err());
        assert!(SmoothingAnimator::new(p, 0.15).is_ok());
    }

    #[test]
    fn test_tick_moves_a_fixed_fraction_of_the_gap() {
        let mut animator = SmoothingAnimator::new(PointerState::new(0.0, 0.0), 0.2).unwrap();
        let rendered = animator.tick(PointerState::new(100.0, 50.0));
        assert!((rendered.x - 20.0).abs() < 1e-12);
        assert!((rendered.y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_within_bounded_tick_count() {
        // Convergence property: with EASE = 0.2, a 500 px offset must close
        // to within 1 px in at most ~35 ticks (ln(500) / -ln(0.8) ≈ 27.9).
        let mut animator = SmoothingAnimator::new(PointerState::new(0.0, 0.0), 0.2).unwrap();
        let target = PointerState::new(500.0, 0.0);

        let mut ticks = 0;
        while animator.rendered().distance_to(target) >= 1.0 {
            animator.tick(target);
            ticks += 1;
            assert!(ticks <= 35, "failed to converge within 35 ticks");
        }
        assert!(ticks > 0);
    }

    #[test]
    fn test_trajectory_is_monotonic_toward_a_fixed_target() {
        // Continuity: each tick strictly reduces the distance to the target
        // without overshooting it.
        let mut animator = SmoothingAnimator::new(PointerState::new(0.0, 0.0), 0.15).unwrap();
        let target = PointerState::new(300.0, 200.0);
        let mut previous = animator.rendered().distance_to(target);
        for _ in 0..100 {
            animator.tick(target);
            let current = animator.rendered().distance_to(target);
            assert!(current < previous, "distance must shrink every tick");
            previous = current;
        }
    }

    #[test]
    fn test_tick_at_target_is_a_fixed_point() {
        let target = PointerState::new(42.0, 24.0);
        let mut animator = SmoothingAnimator::new(target, 0.15).unwrap();
        assert_eq!(animator.tick(target), target);
    }

    #[test]
    fn test_snap_to_jumps_immediately() {
        let mut animator = SmoothingAnimator::new(PointerState::new(0.0, 0.0), 0.15).unwrap();
        animator.snap_to(PointerState::new(400.0, 300.0));
        assert_eq!(animator.rendered(), PointerState::new(400.0, 300.0));
    }

    #[test]
    fn test_animator_follows_a_moving_target() {
        // A retargeted animator keeps easing toward the new target; no state
        // from the old target leaks in.
        let mut animator = SmoothingAnimator::new(PointerState::new(0.0, 0.0), 0.2).unwrap();
        for _ in 0..50 {
            animator.tick(PointerState::new(100.0, 0.0));
        }
        for _ in 0..50 {
            animator.tick(PointerState::new(0.0, 100.0));
        }
        let rendered = animator.rendered();
        assert!(rendered.x < 1.0);
        assert!((rendered.y - 100.0).abs() < 1.0);
    }
}
