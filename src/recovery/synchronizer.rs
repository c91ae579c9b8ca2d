//! Push-model RIC synchronization.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::a1::A1ClientFactory;
use crate::error::RecoveryError;
use crate::repository::{Policies, PolicyTypes, Ric, RicRegistry, RicState};

use super::RecoveryTask;

/// Rebuilds a RIC's remote state from the local stores.
///
/// The local view is treated as the source of truth: a run refreshes the
/// type capability set from the RIC, wipes the RIC's policies, and pushes
/// the locally held set back out. On success the RIC lands in
/// `Available`, on any failure in `Unavailable`; either way it leaves
/// `Recovering`, so supervision can look at it again.
#[derive(Clone)]
pub struct RicSynchronizer {
    rics: Arc<RicRegistry>,
    policies: Arc<Policies>,
    policy_types: Arc<PolicyTypes>,
    client_factory: Arc<dyn A1ClientFactory>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl RicSynchronizer {
    pub fn new(
        rics: Arc<RicRegistry>,
        policies: Arc<Policies>,
        policy_types: Arc<PolicyTypes>,
        client_factory: Arc<dyn A1ClientFactory>,
    ) -> Self {
        Self {
            rics,
            policies,
            policy_types,
            client_factory,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Claim the in-flight slot for `name`. False if a run is already
    /// active, in which case the trigger is dropped.
    fn begin(&self, name: &str) -> bool {
        self.in_flight.lock().insert(name.to_string())
    }

    fn finish(&self, name: &str) {
        self.in_flight.lock().remove(name);
    }

    async fn run(&self, name: &str) {
        let result = self.synchronize(name).await;
        // The slot must be free before the RIC leaves `Recovering`: a
        // sweep can observe the terminal state the moment it lands, and
        // the re-trigger it starts has to be able to claim a fresh run.
        self.finish(name);
        match result {
            Ok(()) => {
                info!(ric = %name, "ric recovered");
                self.rics.transition(name, Some(RicState::Recovering), RicState::Available);
            }
            Err(e) => {
                warn!(ric = %name, error = %e, "ric recovery failed");
                self.rics.transition(name, Some(RicState::Recovering), RicState::Unavailable);
            }
        }
    }

    async fn synchronize(&self, name: &str) -> Result<(), RecoveryError> {
        let ric = self
            .rics
            .get(name)
            .ok_or_else(|| RecoveryError::RicVanished(name.to_string()))?;
        let client = self.client_factory.create_client(&ric).await?;

        // Refresh the capability view first so the push below only
        // re-creates instances the RIC can still host.
        let live_types = client.policy_type_identities().await?;
        for type_id in &live_types {
            if !self.policy_types.contains(type_id) {
                let fetched = client.policy_type(type_id).await?;
                self.policy_types.put(fetched);
            }
        }
        self.rics.set_supported_policy_types(name, live_types.clone());

        // Local store wins: clear the RIC, then push the local set back.
        client.delete_all_policies().await?;
        for policy in self.policies.for_ric(name) {
            if !live_types.contains(&policy.type_id) {
                warn!(
                    ric = %name,
                    policy = %policy.id,
                    type_id = %policy.type_id,
                    "dropping policy whose type the ric no longer supports"
                );
                self.policies.remove(&policy.id);
                continue;
            }
            client.put_policy(&policy).await?;
        }
        Ok(())
    }
}

impl RecoveryTask for RicSynchronizer {
    fn recover(&self, ric: &Ric) {
        if !self.begin(&ric.name) {
            debug!(ric = %ric.name, "recovery already in flight, ignoring trigger");
            return;
        }
        info!(ric = %ric.name, "starting ric recovery");
        let task = self.clone();
        let name = ric.name.clone();
        tokio::spawn(async move {
            task.run(&name).await;
        });
    }
}
