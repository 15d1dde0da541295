//! Spotlight sync protocol message type.
//!
//! Every logical event is one JSON object on the wire. Unlike a tagged
//! protocol, there is no `"type"` discriminant: the object is a flat bag of
//! optional fields, and the fields present determine what the message means.
//! Fields are additive across client variants — a receiver must tolerate any
//! combination of known fields being present or absent, apply only the ones
//! it recognises, and leave unspecified state unchanged. Unknown fields are
//! ignored.
//!
//! # Wire examples
//!
//! ```json
//! {"x":412.5,"y":310.0}
//! {"showPointer":true,"action":"showPointer"}
//! {"x":10.0,"y":20.0,"orientationData":{"alpha":"null","beta":"15.00","gamma":"5.00"}}
//! ```
//!
//! There is no handshake, no versioning, and no acknowledgment; delivery and
//! ordering guarantees are exactly those of the broadcast relay.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Legacy visibility action ──────────────────────────────────────────────────

/// Legacy form of the visibility toggle, carried in the `action` field.
///
/// Older controller variants send `{"action":"showPointer"}` instead of the
/// boolean `showPointer` field. Both forms are accepted; when both are
/// present in one message the boolean wins (see
/// [`SyncMessage::visibility_intent`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerAction {
    #[serde(rename = "showPointer")]
    ShowPointer,
    #[serde(rename = "hidePointer")]
    HidePointer,
}

impl PointerAction {
    /// The visibility value this action requests.
    pub fn as_visibility(self) -> bool {
        matches!(self, PointerAction::ShowPointer)
    }
}

// ── The sync message ──────────────────────────────────────────────────────────

/// A single relay message: a flat JSON object of optional fields.
///
/// | Field             | Meaning                                              |
/// |-------------------|------------------------------------------------------|
/// | `x`, `y`          | target pointer position, destination-screen pixels   |
/// | `showPointer`     | visibility toggle                                    |
/// | `action`          | legacy visibility toggle form                        |
/// | `motionData`      | diagnostic raw acceleration snapshot (display only)  |
/// | `orientationData` | diagnostic raw orientation snapshot (display only)   |
///
/// Diagnostic snapshots are maps of stringified numbers (missing axes appear
/// as the string `"null"`); they are forwarded for display and are not
/// required for correctness.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    #[serde(rename = "showPointer", skip_serializing_if = "Option::is_none")]
    pub show_pointer: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<PointerAction>,

    #[serde(rename = "motionData", skip_serializing_if = "Option::is_none")]
    pub motion_data: Option<BTreeMap<String, String>>,

    #[serde(rename = "orientationData", skip_serializing_if = "Option::is_none")]
    pub orientation_data: Option<BTreeMap<String, String>>,
}

impl SyncMessage {
    /// A position update for the destination display.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A visibility toggle.
    ///
    /// Carries both the boolean field and the legacy `action` form so that
    /// any presentation variant can apply it.
    pub fn visibility(show: bool) -> Self {
        Self {
            show_pointer: Some(show),
            action: Some(if show {
                PointerAction::ShowPointer
            } else {
                PointerAction::HidePointer
            }),
            ..Self::default()
        }
    }

    /// Returns the position carried by this message, if both coordinates are
    /// present. A message with only one coordinate carries no position.
    pub fn position_update(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Resolves the visibility this message requests, if any.
    ///
    /// The boolean `showPointer` field takes precedence over the legacy
    /// `action` form when both are present.
    pub fn visibility_intent(&self) -> Option<bool> {
        self.show_pointer
            .or_else(|| self.action.map(PointerAction::as_visibility))
    }

    /// Returns `true` if no recognised field is present.
    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.show_pointer.is_none()
            && self.action.is_none()
            && self.motion_data.is_none()
            && self.orientation_data.is_none()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_message_serializes_expected_fields() {
        let msg = SyncMessage::position(412.5, 310.0);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""x":412.5"#));
        assert!(json.contains(r#""y":310.0"#));
        // Absent optional fields must be omitted, not serialized as null.
        assert!(!json.contains("showPointer"));
        assert!(!json.contains("action"));
    }

    #[test]
    fn test_visibility_message_carries_both_forms() {
        let json = serde_json::to_string(&SyncMessage::visibility(true)).unwrap();
        assert!(json.contains(r#""showPointer":true"#));
        assert!(json.contains(r#""action":"showPointer""#));

        let json = serde_json::to_string(&SyncMessage::visibility(false)).unwrap();
        assert!(json.contains(r#""showPointer":false"#));
        assert!(json.contains(r#""action":"hidePointer""#));
    }

    #[test]
    fn test_deserializes_bare_position() {
        let msg: SyncMessage = serde_json::from_str(r#"{"x":100.0,"y":200.0}"#).unwrap();
        assert_eq!(msg.position_update(), Some((100.0, 200.0)));
        assert_eq!(msg.visibility_intent(), None);
    }

    #[test]
    fn test_deserializes_legacy_action_form() {
        let msg: SyncMessage = serde_json::from_str(r#"{"action":"hidePointer"}"#).unwrap();
        assert_eq!(msg.visibility_intent(), Some(false));
        assert_eq!(msg.position_update(), None);
    }

    #[test]
    fn test_boolean_field_wins_over_legacy_action() {
        let msg: SyncMessage =
            serde_json::from_str(r#"{"showPointer":true,"action":"hidePointer"}"#).unwrap();
        assert_eq!(msg.visibility_intent(), Some(true));
    }

    #[test]
    fn test_single_coordinate_is_not_a_position_update() {
        // A receiver must apply only the fields it recognises; half a
        // position is treated as no position.
        let msg: SyncMessage = serde_json::from_str(r#"{"x":5.0}"#).unwrap();
        assert_eq!(msg.position_update(), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let msg: SyncMessage =
            serde_json::from_str(r#"{"x":1.0,"y":2.0,"futureField":"whatever"}"#).unwrap();
        assert_eq!(msg.position_update(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_empty_object_is_a_valid_empty_message() {
        let msg: SyncMessage = serde_json::from_str("{}").unwrap();
        assert!(msg.is_empty());
    }

    #[test]
    fn test_diagnostic_snapshot_round_trips() {
        let mut fields = BTreeMap::new();
        fields.insert("beta".to_string(), "15.00".to_string());
        fields.insert("gamma".to_string(), "null".to_string());
        let original = SyncMessage {
            orientation_data: Some(fields),
            ..SyncMessage::default()
        };

        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains(r#""orientationData""#));
        let decoded: SyncMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_combined_message_applies_all_recognised_fields() {
        // One message may carry position, visibility, and diagnostics at once.
        let json = r#"{
            "x": 400.0,
            "y": 310.0,
            "showPointer": true,
            "motionData": {"x": "0.10", "y": "null", "z": "9.81"}
        }"#;
        let msg: SyncMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.position_update(), Some((400.0, 310.0)));
        assert_eq!(msg.visibility_intent(), Some(true));
        assert_eq!(msg.motion_data.as_ref().unwrap()["y"], "null");
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let result: Result<SyncMessage, _> = serde_json::from_str("not json at all");
        assert!(result.is_err());
    }
}
