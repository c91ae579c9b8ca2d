//! Per-RIC reconciliation pipeline.
//!
//! Each check walks the same sequence: state gate, policy instance
//! comparison, policy type comparison. The first disagreement wins and
//! turns into a recovery trigger; transport failures abandon the check
//! without touching anything. Drift is a normal outcome here, not an
//! error.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::a1::A1ClientFactory;
use crate::error::A1Error;
use crate::recovery::RecoveryTask;
use crate::repository::{Policies, Ric, RicRegistry, RicState, TransitionOutcome};

/// Why a check decided to start a recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryReason {
    /// The RIC has never been synchronized.
    NeverSynchronized,
    /// A previous recovery failed and is being retried.
    RetryAfterFailure,
    /// The policy instance views disagree.
    PolicyDrift,
    /// The policy type views disagree.
    PolicyTypeDrift,
}

impl RecoveryReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryReason::NeverSynchronized => "never synchronized",
            RecoveryReason::RetryAfterFailure => "retry after failed recovery",
            RecoveryReason::PolicyDrift => "policy drift",
            RecoveryReason::PolicyTypeDrift => "policy type drift",
        }
    }
}

/// Terminal outcome of one per-RIC check.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// Local view and remote state agree; nothing to do.
    Checked,
    /// A recovery was triggered for the given reason.
    RecoveryStarted(RecoveryReason),
    /// Nothing done: a recovery is already in flight, the transition
    /// race was lost, or the RIC vanished mid-check.
    Skipped,
    /// Transport failure. State untouched; retried next sweep.
    Abandoned(A1Error),
}

/// Runs the reconciliation pipeline for individual RICs.
///
/// Cheap to clone; all fields are shared handles. The supervisor clones
/// one per check task.
#[derive(Clone)]
pub struct RicChecker {
    rics: Arc<RicRegistry>,
    policies: Arc<Policies>,
    client_factory: Arc<dyn A1ClientFactory>,
    recovery: Arc<dyn RecoveryTask>,
}

impl RicChecker {
    pub fn new(
        rics: Arc<RicRegistry>,
        policies: Arc<Policies>,
        client_factory: Arc<dyn A1ClientFactory>,
        recovery: Arc<dyn RecoveryTask>,
    ) -> Self {
        Self { rics, policies, client_factory, recovery }
    }

    /// One full check for `ric`, a registry snapshot entry.
    ///
    /// The state gate comes before client acquisition, so a RIC that is
    /// mid-recovery or was never synchronized costs no remote calls.
    pub async fn check_ric(&self, ric: &Ric) -> CheckOutcome {
        match ric.state {
            RicState::Recovering => {
                debug!(ric = %ric.name, "recovery in flight, skipping check");
                CheckOutcome::Skipped
            }
            RicState::Undefined => self.trigger_recovery(ric, RecoveryReason::NeverSynchronized),
            RicState::Unavailable => self.trigger_recovery(ric, RecoveryReason::RetryAfterFailure),
            RicState::Available => self.check_consistency(ric).await,
        }
    }

    async fn check_consistency(&self, ric: &Ric) -> CheckOutcome {
        let client = match self.client_factory.create_client(ric).await {
            Ok(client) => client,
            Err(e) => return self.abandon(ric, e),
        };

        let live_policies = match client.policy_identities().await {
            Ok(ids) => ids,
            Err(e) => return self.abandon(ric, e),
        };
        let local = self.policies.id_snapshot(&ric.name);
        if policy_view_drifted(&live_policies, &local.for_ric, &local.known) {
            return self.trigger_recovery(ric, RecoveryReason::PolicyDrift);
        }

        let live_types = match client.policy_type_identities().await {
            Ok(ids) => ids,
            Err(e) => return self.abandon(ric, e),
        };
        // Compare against the current registry entry, not the sweep
        // snapshot: a recovery finishing mid-check may have refreshed
        // the supported set.
        let Some(current) = self.rics.get(&ric.name) else {
            debug!(ric = %ric.name, "ric vanished mid-check");
            return CheckOutcome::Skipped;
        };
        if type_view_drifted(&live_types, &current.supported_policy_types) {
            return self.trigger_recovery(ric, RecoveryReason::PolicyTypeDrift);
        }

        info!(ric = %ric.name, "ric checked");
        CheckOutcome::Checked
    }

    fn abandon(&self, ric: &Ric, error: A1Error) -> CheckOutcome {
        debug!(ric = %ric.name, error = %error, "check abandoned, retrying next sweep");
        CheckOutcome::Abandoned(error)
    }

    /// Claim the `Recovering` state and hand the RIC to the recovery
    /// task. The compare-and-set is the duplicate-recovery guard: of all
    /// concurrent triggers for one RIC, exactly one wins; the rest land
    /// in `Skipped`.
    fn trigger_recovery(&self, ric: &Ric, reason: RecoveryReason) -> CheckOutcome {
        match self.rics.transition(&ric.name, Some(ric.state), RicState::Recovering) {
            TransitionOutcome::Applied { .. } => {
                warn!(
                    ric = %ric.name,
                    reason = reason.as_str(),
                    "ric out of sync, starting recovery"
                );
                if let Some(current) = self.rics.get(&ric.name) {
                    self.recovery.recover(&current);
                }
                CheckOutcome::RecoveryStarted(reason)
            }
            TransitionOutcome::Rejected { actual } => {
                debug!(ric = %ric.name, actual = %actual, "lost recovery race, skipping");
                CheckOutcome::Skipped
            }
            TransitionOutcome::UnknownRic => {
                debug!(ric = %ric.name, "ric vanished before recovery could start");
                CheckOutcome::Skipped
            }
        }
    }
}

/// True when the policy instances a RIC reports disagree with the local
/// view: the count must match the local set held for that RIC and every
/// reported id must be known locally, whichever RIC it is filed under.
pub fn policy_view_drifted(
    live: &HashSet<String>,
    local_for_ric: &HashSet<String>,
    locally_known: &HashSet<String>,
) -> bool {
    live.len() != local_for_ric.len() || live.iter().any(|id| !locally_known.contains(id))
}

/// True when the type set a RIC reports differs from the set last
/// learned from it. Plain set equality via size plus membership.
pub fn type_view_drifted(live: &HashSet<String>, declared: &HashSet<String>) -> bool {
    live.len() != declared.len() || live.iter().any(|id| !declared.contains(id))
}
