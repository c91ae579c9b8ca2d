//! Shared test infrastructure for the supervision integration tests.
//!
//! Provides a scriptable in-memory A1 fleet (per-RIC answers, failure
//! injection, blocking) and a recording recovery task, so the engine can
//! be exercised end to end without a network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

use ric_supervisor::a1::{A1Client, A1ClientFactory};
use ric_supervisor::error::A1Error;
use ric_supervisor::recovery::RecoveryTask;
use ric_supervisor::repository::{Policy, PolicyType, Ric, RicRegistry, RicState};

pub fn set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Scripted behavior and call counters for one RIC.
#[derive(Default)]
pub struct ScriptedRic {
    /// Remote policy ids. Client writes mutate this set, so a repaired
    /// RIC really looks repaired to the next check.
    pub live_policies: Mutex<HashSet<String>>,
    pub live_types: Mutex<HashSet<String>>,
    pub fail_connect: AtomicBool,
    pub fail_policy_query: AtomicBool,
    pub fail_type_query: AtomicBool,
    /// When set, policy queries park on `gate` until it is opened.
    pub hold_policy_query: AtomicBool,
    pub gate: Notify,
    pub connect_calls: AtomicUsize,
    pub policy_calls: AtomicUsize,
    pub type_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub put_ids: Mutex<Vec<String>>,
}

impl ScriptedRic {
    pub fn open_gate(&self) {
        self.gate.notify_one();
    }
}

/// In-memory A1 fleet; hands out clients backed by [`ScriptedRic`]s.
#[derive(Default)]
pub struct ScriptedFleet {
    rics: Mutex<HashMap<String, Arc<ScriptedRic>>>,
}

impl ScriptedFleet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a RIC and return the handle tests use to steer it.
    pub fn add(&self, name: &str) -> Arc<ScriptedRic> {
        let scripted = Arc::new(ScriptedRic::default());
        self.rics.lock().insert(name.to_string(), scripted.clone());
        scripted
    }

    pub fn get(&self, name: &str) -> Arc<ScriptedRic> {
        self.rics.lock().get(name).cloned().expect("ric not scripted")
    }
}

#[async_trait]
impl A1ClientFactory for ScriptedFleet {
    async fn create_client(&self, ric: &Ric) -> Result<Arc<dyn A1Client>, A1Error> {
        let script = self.rics.lock().get(&ric.name).cloned().unwrap_or_default();
        script.connect_calls.fetch_add(1, Ordering::SeqCst);
        if script.fail_connect.load(Ordering::SeqCst) {
            return Err(A1Error::connect(ric.name.as_str(), "connection refused"));
        }
        Ok(Arc::new(ScriptedClient { name: ric.name.clone(), script }))
    }
}

struct ScriptedClient {
    name: String,
    script: Arc<ScriptedRic>,
}

#[async_trait]
impl A1Client for ScriptedClient {
    async fn policy_identities(&self) -> Result<HashSet<String>, A1Error> {
        self.script.policy_calls.fetch_add(1, Ordering::SeqCst);
        if self.script.hold_policy_query.load(Ordering::SeqCst) {
            self.script.gate.notified().await;
        }
        if self.script.fail_policy_query.load(Ordering::SeqCst) {
            return Err(A1Error::remote(self.name.as_str(), "policy query failed"));
        }
        Ok(self.script.live_policies.lock().clone())
    }

    async fn policy_type_identities(&self) -> Result<HashSet<String>, A1Error> {
        self.script.type_calls.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_type_query.load(Ordering::SeqCst) {
            return Err(A1Error::remote(self.name.as_str(), "type query failed"));
        }
        Ok(self.script.live_types.lock().clone())
    }

    async fn policy_type(&self, type_id: &str) -> Result<PolicyType, A1Error> {
        Ok(PolicyType::new(type_id, json!({"type": "object"})))
    }

    async fn put_policy(&self, policy: &Policy) -> Result<(), A1Error> {
        self.script.put_ids.lock().push(policy.id.clone());
        self.script.live_policies.lock().insert(policy.id.clone());
        Ok(())
    }

    async fn delete_all_policies(&self) -> Result<(), A1Error> {
        self.script.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.script.live_policies.lock().clear();
        Ok(())
    }
}

/// Records recovery triggers instead of repairing anything.
///
/// By default the triggered RIC stays in `Recovering`, like a repair
/// that has not finished. With [`RecordingRecovery::completing`] each
/// trigger lands the RIC in the given state immediately, imitating an
/// instant repair.
#[derive(Default)]
pub struct RecordingRecovery {
    triggered: Mutex<Vec<String>>,
    complete: Option<(Arc<RicRegistry>, RicState)>,
}

impl RecordingRecovery {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn completing(rics: Arc<RicRegistry>, to: RicState) -> Arc<Self> {
        Arc::new(Self { triggered: Mutex::new(Vec::new()), complete: Some((rics, to)) })
    }

    pub fn names(&self) -> Vec<String> {
        self.triggered.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.triggered.lock().len()
    }

    pub fn count_for(&self, name: &str) -> usize {
        self.triggered.lock().iter().filter(|n| n.as_str() == name).count()
    }
}

impl RecoveryTask for RecordingRecovery {
    fn recover(&self, ric: &Ric) {
        self.triggered.lock().push(ric.name.clone());
        if let Some((rics, to)) = &self.complete {
            rics.transition(&ric.name, Some(RicState::Recovering), *to);
        }
    }
}

/// Register a RIC that is `Available` and in agreement with its
/// scripted remote side: no policies anywhere, declared types equal to
/// `types`. Tests perturb from this baseline.
pub fn add_consistent_ric(
    rics: &RicRegistry,
    fleet: &ScriptedFleet,
    name: &str,
    types: &[&str],
) -> Arc<ScriptedRic> {
    rics.register(Ric::new(name, format!("http://{name}:8085"), vec![]));
    rics.transition(name, None, RicState::Available);
    rics.set_supported_policy_types(name, set(types));
    let script = fleet.add(name);
    *script.live_types.lock() = set(types);
    script
}

/// Poll `condition` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + timeout;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {timeout:?}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
