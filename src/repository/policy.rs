//! Local store of policy instances.
//!
//! The store is the "desired state" side of reconciliation: supervision
//! compares what a RIC reports against what is held here, and recovery
//! pushes this content back out to the RIC.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// One policy instance, bound to exactly one RIC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Globally unique instance id.
    pub id: String,
    /// Name of the RIC carrying this policy.
    pub ric_name: String,
    /// Policy type the instance conforms to.
    pub type_id: String,
    /// Service that created the policy.
    pub owner: String,
    /// The policy body, opaque to the engine.
    pub json: serde_json::Value,
    pub last_modified: DateTime<Utc>,
}

impl Policy {
    pub fn new(
        id: impl Into<String>,
        ric_name: impl Into<String>,
        type_id: impl Into<String>,
        owner: impl Into<String>,
        json: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            ric_name: ric_name.into(),
            type_id: type_id.into(),
            owner: owner.into(),
            json,
            last_modified: Utc::now(),
        }
    }
}

/// Ids visible in the store at one instant, taken under a single lock.
///
/// Drift comparison needs both views at once; reading them in two steps
/// could interleave with a writer and report drift that never existed.
#[derive(Debug, Clone)]
pub struct PolicyIdSnapshot {
    /// Ids of the policies bound to the queried RIC.
    pub for_ric: HashSet<String>,
    /// Every id known locally, regardless of RIC.
    pub known: HashSet<String>,
}

#[derive(Debug, Default)]
struct PolicyMap {
    by_id: HashMap<String, Policy>,
    by_ric: HashMap<String, HashSet<String>>,
}

/// Thread-safe policy store indexed by id and by owning RIC.
#[derive(Debug, Default)]
pub struct Policies {
    inner: RwLock<PolicyMap>,
}

impl Policies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a policy. A replace that moves the policy to a
    /// different RIC also moves the per-RIC index entry.
    pub fn put(&self, policy: Policy) -> Option<Policy> {
        let mut inner = self.inner.write();
        let previous = inner.by_id.insert(policy.id.clone(), policy.clone());
        if let Some(ref old) = previous {
            if old.ric_name != policy.ric_name {
                if let Some(ids) = inner.by_ric.get_mut(&old.ric_name) {
                    ids.remove(&old.id);
                }
            }
        }
        inner.by_ric.entry(policy.ric_name.clone()).or_default().insert(policy.id);
        previous
    }

    pub fn remove(&self, id: &str) -> Option<Policy> {
        let mut inner = self.inner.write();
        let removed = inner.by_id.remove(id)?;
        if let Some(ids) = inner.by_ric.get_mut(&removed.ric_name) {
            ids.remove(id);
            if ids.is_empty() {
                inner.by_ric.remove(&removed.ric_name);
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<Policy> {
        self.inner.read().by_id.get(id).cloned()
    }

    /// Whether `id` exists anywhere in the store, under any RIC.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().by_id.contains_key(id)
    }

    /// Ids of the policies bound to `ric_name`.
    pub fn ids_for_ric(&self, ric_name: &str) -> HashSet<String> {
        self.inner
            .read()
            .by_ric
            .get(ric_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Full policies bound to `ric_name`.
    pub fn for_ric(&self, ric_name: &str) -> Vec<Policy> {
        let inner = self.inner.read();
        match inner.by_ric.get(ric_name) {
            Some(ids) => ids.iter().filter_map(|id| inner.by_id.get(id).cloned()).collect(),
            None => Vec::new(),
        }
    }

    /// Both id views in one lock acquisition. See [`PolicyIdSnapshot`].
    pub fn id_snapshot(&self, ric_name: &str) -> PolicyIdSnapshot {
        let inner = self.inner.read();
        PolicyIdSnapshot {
            for_ric: inner.by_ric.get(ric_name).cloned().unwrap_or_default(),
            known: inner.by_id.keys().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().by_id.is_empty()
    }
}
