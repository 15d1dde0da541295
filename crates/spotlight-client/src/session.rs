//! The client-side pointer session state machine.
//!
//! [`PointerSession`] owns every piece of per-client state the pipeline
//! needs — role, visibility, calibration, the mapper's target, the smoothing
//! animator and both rate gates — and exposes it through a handful of pure
//! transition methods. The session performs no I/O and never reads the
//! clock: callers inject `Instant`s, which is what makes the throttling
//! behaviour testable without sleeping.
//!
//! The runtime (see [`crate::runtime`]) wires a session to a relay link, a
//! sensor source and a render sink.

use std::time::{Duration, Instant};

use tracing::debug;

use spotlight_core::{
    Calibrator, DisplayBounds, IntervalGate, MotionSample, PermissionState, PointerError,
    PointerMapper, PointerState, Role, SmoothingAnimator, SyncMessage, EASE, PUBLISH_FLOOR,
    SAMPLE_FLOOR, SENSITIVITY,
};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Tunable parameters for a [`PointerSession`].
///
/// The defaults are the design values; tests override individual knobs to
/// tighten timing or exaggerate motion.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// The logical display surface the pointer lives on.
    pub bounds: DisplayBounds,
    /// Tilt-to-pixel gain, in pixels per degree per sample.
    pub sensitivity: f64,
    /// Smoothing factor per animation frame, in `(0, 1)`.
    pub ease: f64,
    /// Minimum interval between processed sensor samples.
    pub sample_floor: Duration,
    /// Minimum interval between outbound position messages.
    pub publish_floor: Duration,
}

impl SessionConfig {
    /// Design-value configuration for the given display bounds.
    pub fn new(bounds: DisplayBounds) -> Self {
        Self {
            bounds,
            sensitivity: SENSITIVITY,
            ease: EASE,
            sample_floor: SAMPLE_FLOOR,
            publish_floor: PUBLISH_FLOOR,
        }
    }
}

// ── Session outcomes ──────────────────────────────────────────────────────────

/// What [`PointerSession::handle_inbound`] did with a relay message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// The message arrived while in controller role and was dropped outright.
    Ignored,
    /// The message was applied in presentation role.
    Applied {
        /// A complete coordinate pair was present and moved the target.
        position_updated: bool,
        /// A visibility intent was present and changed the visible flag.
        visibility_changed: bool,
    },
}

/// A point-in-time copy of the observable session state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSnapshot {
    pub role: Role,
    pub visible: bool,
    pub permission: PermissionState,
    pub target: PointerState,
    pub rendered: PointerState,
    pub calibrated: bool,
}

// ── The session ───────────────────────────────────────────────────────────────

/// Per-client pointer state and the transitions the pipeline performs on it.
///
/// A session always starts in [`Role::Presentation`] with the pointer hidden
/// and the target at the display centre. The same object serves both roles;
/// [`Self::toggle_role`] switches which set of transitions is live:
///
/// - **Controller**: [`Self::handle_sensor`] maps motion samples into target
///   movement and throttled outbound [`SyncMessage`]s; inbound messages are
///   ignored.
/// - **Presentation**: [`Self::handle_inbound`] applies remote position and
///   visibility updates; sensor samples are ignored.
///
/// In both roles [`Self::animation_tick`] eases the rendered position toward
/// the target once per display frame.
#[derive(Debug)]
pub struct PointerSession {
    role: Role,
    visible: bool,
    permission: PermissionState,
    calibrator: Calibrator,
    mapper: PointerMapper,
    animator: SmoothingAnimator,
    sample_gate: IntervalGate,
    publish_gate: IntervalGate,
    /// Where the pointer is headed; the animator chases this.
    target: PointerState,
}

impl PointerSession {
    /// Creates a session at the display centre, hidden, in presentation role.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::EaseOutOfRange`] if the configured ease factor
    /// is not strictly between 0 and 1.
    pub fn new(config: SessionConfig) -> Result<Self, PointerError> {
        let center = config.bounds.center();
        Ok(Self {
            role: Role::default(),
            visible: false,
            permission: PermissionState::default(),
            calibrator: Calibrator::new(),
            mapper: PointerMapper::new(config.bounds).with_sensitivity(config.sensitivity),
            animator: SmoothingAnimator::new(center, config.ease)?,
            sample_gate: IntervalGate::new(config.sample_floor),
            publish_gate: IntervalGate::new(config.publish_floor),
            target: center,
        })
    }

    // ── Accessors ──

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// The position the animator is converging toward.
    pub fn target(&self) -> PointerState {
        self.target
    }

    /// Whether the session currently needs a live sensor subscription:
    /// controller role with a permission state that allows sampling.
    pub fn wants_sensor(&self) -> bool {
        self.role.is_controller() && self.permission.allows_sampling()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            role: self.role,
            visible: self.visible,
            permission: self.permission,
            target: self.target,
            rendered: self.animator.rendered(),
            calibrated: self.calibrator.reference().is_some(),
        }
    }

    // ── Transitions ──

    /// Records the sensor permission outcome. A denial is not an error: the
    /// session stays interactive and simply never maps samples.
    pub fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
    }

    /// Switches between presentation and controller roles.
    ///
    /// Leaving the controller role discards the calibration reference, any
    /// pending capture, and the in-flight motion: the target snaps to the
    /// currently rendered position so the pointer stops where it is. Both
    /// gates are reset so the next controller session starts fresh.
    pub fn toggle_role(&mut self) -> Role {
        self.role = self.role.toggled();
        if self.role.is_presentation() {
            self.calibrator.reset();
            self.target = self.animator.rendered();
            self.sample_gate.reset();
            self.publish_gate.reset();
        }
        debug!(role = ?self.role, "role toggled");
        self.role
    }

    /// Changes pointer visibility, returning the message to publish if the
    /// flag actually changed.
    ///
    /// Visibility transitions are deliberately *not* throttled — a hide must
    /// never be dropped, or the remote pointer sticks on screen. A show
    /// transition in controller role also arms a one-shot calibration
    /// capture, so the very next orientation sample becomes the zero pose.
    pub fn set_visibility(&mut self, show: bool) -> Option<SyncMessage> {
        if show == self.visible {
            return None;
        }
        self.visible = show;
        if show && self.role.is_controller() {
            self.calibrator.arm();
        }
        Some(SyncMessage::visibility(show))
    }

    /// Feeds one raw sensor sample through the pipeline at time `now`.
    ///
    /// Processing order: role/permission guard, sample-rate gate, one-shot
    /// calibration capture, mapping into the target, then the publish gate.
    /// Returns a position message only when the pointer is visible and the
    /// publish floor has elapsed; the target still advances on every
    /// accepted sample, so unpublished motion is not lost.
    pub fn handle_sensor(&mut self, sample: &MotionSample, now: Instant) -> Option<SyncMessage> {
        if !self.wants_sensor() {
            return None;
        }
        if !self.sample_gate.try_fire(now) {
            return None;
        }

        // An armed calibrator consumes the first orientation sample as the
        // zero pose. The same sample then maps to a zero delta, which is
        // exactly the intended "no movement at the resting angle".
        if let Some(orientation) = sample.as_orientation() {
            if self.calibrator.is_armed() {
                self.calibrator.observe(orientation);
            }
        }

        self.target = match sample {
            MotionSample::Orientation(o) => {
                self.mapper
                    .step_orientation(self.target, o, self.calibrator.reference())
            }
            MotionSample::Acceleration(a) => self.mapper.step_acceleration(self.target, a),
        };

        if !self.visible {
            return None;
        }
        if !self.publish_gate.try_fire(now) {
            return None;
        }

        let mut message = SyncMessage::position(self.target.x, self.target.y);
        match sample {
            MotionSample::Orientation(o) => message.orientation_data = Some(o.diagnostic()),
            MotionSample::Acceleration(a) => message.motion_data = Some(a.diagnostic()),
        }
        Some(message)
    }

    /// Applies a message received from the relay.
    ///
    /// Only the presentation role consumes remote state; a controller drops
    /// inbound traffic outright (it is the authority on its own pointer).
    /// Partial messages are fine: a coordinate pair moves the target, a
    /// visibility intent flips the flag, and absent fields leave their state
    /// untouched. Remote coordinates are clamped to the local bounds, since
    /// the two displays need not agree on dimensions.
    pub fn handle_inbound(&mut self, message: &SyncMessage) -> InboundOutcome {
        if !self.role.is_presentation() {
            return InboundOutcome::Ignored;
        }

        let mut position_updated = false;
        if let Some((x, y)) = message.position_update() {
            self.target = self.mapper.bounds().clamp(PointerState::new(x, y));
            position_updated = true;
        }

        let mut visibility_changed = false;
        if let Some(show) = message.visibility_intent() {
            visibility_changed = show != self.visible;
            self.visible = show;
        }

        InboundOutcome::Applied {
            position_updated,
            visibility_changed,
        }
    }

    /// Advances the smoothing animator one display frame toward the target
    /// and returns the new rendered position.
    pub fn animation_tick(&mut self) -> PointerState {
        self.animator.tick(self.target)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
