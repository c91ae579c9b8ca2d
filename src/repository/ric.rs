//! RIC domain types.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a managed RIC.
///
/// State transitions during supervision:
/// - `Undefined` -> `Recovering`: first contact, schedule initial sync
/// - `Available` -> `Recovering`: drift detected between local and remote
/// - `Recovering` -> `Available`: recovery completed successfully
/// - `Recovering` -> `Unavailable`: recovery failed, retried next sweep
/// - `Unavailable` -> `Recovering`: retry after a failed recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RicState {
    /// Never synchronized; the local view for this RIC is not trustworthy.
    #[default]
    Undefined,
    /// Local view and remote state agreed at the last check.
    Available,
    /// A recovery is in flight. Acts as an exclusion lock: no checks and
    /// no second recovery run while in this state.
    Recovering,
    /// The last recovery failed. The RIC stays out of normal checking
    /// until a later sweep retries it.
    Unavailable,
}

impl RicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RicState::Undefined => "UNDEFINED",
            RicState::Available => "AVAILABLE",
            RicState::Recovering => "RECOVERING",
            RicState::Unavailable => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for RicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One remote controller as known locally.
///
/// Instances handed out by the registry are snapshots: mutating a clone
/// has no effect on registry state. All registry-visible changes go
/// through [`RicRegistry`](crate::repository::RicRegistry) methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ric {
    /// Unique name, the registry key.
    pub name: String,
    /// Where this RIC sits in the supervision lifecycle.
    pub state: RicState,
    /// A1 endpoint the transport client connects to.
    pub base_url: String,
    /// Policy type ids this RIC supports, as last learned from it.
    /// Empty until the first successful recovery.
    pub supported_policy_types: HashSet<String>,
    /// Near-RT elements this RIC manages, from fleet configuration.
    pub managed_element_ids: Vec<String>,
}

impl Ric {
    /// A freshly configured RIC. Starts `Undefined` so the first
    /// supervision sweep triggers an initial synchronization.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        managed_element_ids: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            state: RicState::default(),
            base_url: base_url.into(),
            supported_policy_types: HashSet::new(),
            managed_element_ids,
        }
    }

    pub fn supports_policy_type(&self, type_id: &str) -> bool {
        self.supported_policy_types.contains(type_id)
    }

    pub fn manages_element(&self, element_id: &str) -> bool {
        self.managed_element_ids.iter().any(|id| id == element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ric_starts_undefined() {
        let ric = Ric::new("ric-1", "http://ric-1:8085", vec!["kista_1".to_string()]);
        assert_eq!(ric.state, RicState::Undefined);
        assert!(ric.supported_policy_types.is_empty());
        assert!(ric.manages_element("kista_1"));
        assert!(!ric.manages_element("kista_2"));
    }

    #[test]
    fn test_supports_policy_type() {
        let mut ric = Ric::new("ric-1", "http://ric-1:8085", vec![]);
        ric.supported_policy_types.insert("qos-1".to_string());
        assert!(ric.supports_policy_type("qos-1"));
        assert!(!ric.supports_policy_type("qos-2"));
    }

    #[test]
    fn test_state_round_trips_through_serde() {
        let json = serde_json::to_string(&RicState::Recovering).unwrap();
        assert_eq!(json, "\"RECOVERING\"");
        let back: RicState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RicState::Recovering);
    }

    #[test]
    fn test_state_as_str_matches_display() {
        for state in [
            RicState::Undefined,
            RicState::Available,
            RicState::Recovering,
            RicState::Unavailable,
        ] {
            assert_eq!(state.to_string(), state.as_str());
        }
    }
}
