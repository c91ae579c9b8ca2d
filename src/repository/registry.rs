//! Canonical registry of known RICs.
//!
//! The registry is the single writer-serialization point for RIC state.
//! [`RicRegistry::transition`] is a compare-and-set: concurrent actors
//! (supervision pipelines, recovery tasks) race through it and exactly
//! one wins each transition. Callers act on the outcome, never on a
//! state they read earlier.

use std::collections::BTreeMap;
use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::debug;

use crate::repository::ric::{Ric, RicState};

/// Result of a [`RicRegistry::transition`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The state was updated. `from` is the state it held before.
    Applied { from: RicState },
    /// The compare-and-set lost: the RIC was not in the expected state.
    Rejected { actual: RicState },
    /// The RIC is not registered. Treated as a quiet no-op so races
    /// against fleet reconfiguration never surface as errors.
    UnknownRic,
}

impl TransitionOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }
}

/// Thread-safe map of RIC name to [`Ric`].
///
/// Iteration order is the lexicographic order of names, so snapshots are
/// deterministic across sweeps. Reads hand out clones; writers go through
/// the mutation methods below.
#[derive(Debug, Default)]
pub struct RicRegistry {
    rics: RwLock<BTreeMap<String, Ric>>,
}

impl RicRegistry {
    pub fn new() -> Self {
        Self { rics: RwLock::new(BTreeMap::new()) }
    }

    /// Insert or replace a RIC under its name.
    pub fn register(&self, ric: Ric) {
        debug!(ric = %ric.name, state = %ric.state, "ric registered");
        self.rics.write().insert(ric.name.clone(), ric);
    }

    /// Remove a RIC. Ongoing checks against it finish on their snapshot
    /// and their transitions land in [`TransitionOutcome::UnknownRic`].
    pub fn remove(&self, name: &str) -> Option<Ric> {
        self.rics.write().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Ric> {
        self.rics.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rics.read().contains_key(name)
    }

    /// Point-in-time copy of every registered RIC, ordered by name.
    pub fn snapshot(&self) -> Vec<Ric> {
        self.rics.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rics.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rics.read().is_empty()
    }

    /// Compare-and-set the state of `name`.
    ///
    /// With `expected = Some(s)` the write happens only if the RIC is
    /// currently in `s`; otherwise the attempt is rejected and the actual
    /// state is returned. `expected = None` is an unconditional set, used
    /// by recovery completion paths that own the RIC while it is
    /// `Recovering`.
    pub fn transition(
        &self,
        name: &str,
        expected: Option<RicState>,
        to: RicState,
    ) -> TransitionOutcome {
        let mut rics = self.rics.write();
        let Some(ric) = rics.get_mut(name) else {
            return TransitionOutcome::UnknownRic;
        };
        let from = ric.state;
        if let Some(expected) = expected {
            if from != expected {
                debug!(
                    ric = %name,
                    expected = %expected,
                    actual = %from,
                    "state transition rejected"
                );
                return TransitionOutcome::Rejected { actual: from };
            }
        }
        ric.state = to;
        debug!(ric = %name, from = %from, to = %to, "ric state changed");
        TransitionOutcome::Applied { from }
    }

    /// Replace the supported-type set learned from the RIC. Quiet no-op
    /// if the RIC has been removed meanwhile.
    pub fn set_supported_policy_types(&self, name: &str, type_ids: HashSet<String>) -> bool {
        let mut rics = self.rics.write();
        match rics.get_mut(name) {
            Some(ric) => {
                ric.supported_policy_types = type_ids;
                true
            }
            None => false,
        }
    }
}
