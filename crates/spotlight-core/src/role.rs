//! The client role: controller or presentation.
//!
//! A role is a purely local choice. It is never transmitted over the relay
//! and there is no cross-peer negotiation: each client decides independently
//! whether it produces pointer positions (controller) or renders them
//! (presentation). Switching is a single user action that toggles between
//! the two states.

use serde::{Deserialize, Serialize};

/// Which side of the pointer exchange this client currently plays.
///
/// Every client starts in [`Role::Presentation`] and toggles from there.
/// The side effects of a transition (subscribing/unsubscribing the sensor
/// stream, discarding calibration state) are owned by the session that holds
/// the role, not by the enum itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Renders the pointer driven by inbound relay messages. The initial state.
    #[default]
    Presentation,
    /// Produces pointer positions from the local motion sensor.
    Controller,
}

impl Role {
    /// Returns the opposite role.
    pub fn toggled(self) -> Role {
        match self {
            Role::Presentation => Role::Controller,
            Role::Controller => Role::Presentation,
        }
    }

    /// Returns `true` if this client is currently the controller.
    pub fn is_controller(self) -> bool {
        matches!(self, Role::Controller)
    }

    /// Returns `true` if this client is currently the presentation display.
    pub fn is_presentation(self) -> bool {
        matches!(self, Role::Presentation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_role_is_presentation() {
        assert_eq!(Role::default(), Role::Presentation);
    }

    #[test]
    fn test_toggle_alternates_between_roles() {
        let role = Role::default();
        assert_eq!(role.toggled(), Role::Controller);
        assert_eq!(role.toggled().toggled(), Role::Presentation);
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Controller.is_controller());
        assert!(!Role::Controller.is_presentation());
        assert!(Role::Presentation.is_presentation());
        assert!(!Role::Presentation.is_controller());
    }
}
