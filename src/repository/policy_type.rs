//! Local cache of policy type schemas.
//!
//! Types are global across the fleet: two RICs supporting the same type
//! share one entry here. Which RIC supports which type lives on the
//! [`Ric`](crate::repository::Ric) itself.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A policy type and its JSON schema, as served by the RICs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyType {
    pub id: String,
    /// JSON schema for policy bodies of this type. Opaque to the engine.
    pub schema: serde_json::Value,
}

impl PolicyType {
    pub fn new(id: impl Into<String>, schema: serde_json::Value) -> Self {
        Self { id: id.into(), schema }
    }
}

/// Thread-safe schema cache keyed by type id.
#[derive(Debug, Default)]
pub struct PolicyTypes {
    types: RwLock<HashMap<String, PolicyType>>,
}

impl PolicyTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, policy_type: PolicyType) {
        self.types.write().insert(policy_type.id.clone(), policy_type);
    }

    pub fn get(&self, id: &str) -> Option<PolicyType> {
        self.types.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.types.read().contains_key(id)
    }

    pub fn ids(&self) -> HashSet<String> {
        self.types.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}
