//! A1 transport seam.
//!
//! Supervision and recovery talk to RICs only through these traits, so
//! the reconciliation logic stays independent of the concrete protocol
//! binding. [`rest::RestClientFactory`] is the production implementation;
//! tests substitute in-memory fakes.

mod rest;

pub use rest::RestClientFactory;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::A1Error;
use crate::repository::{Policy, PolicyType, Ric};

/// A connection to one RIC.
///
/// The read methods are what supervision needs to detect drift; the write
/// methods are what recovery needs to repair it. Implementations must be
/// safe to share across tasks.
#[async_trait]
pub trait A1Client: Send + Sync {
    /// Ids of every policy instance currently live at the RIC.
    async fn policy_identities(&self) -> Result<HashSet<String>, A1Error>;

    /// Ids of every policy type the RIC currently supports.
    async fn policy_type_identities(&self) -> Result<HashSet<String>, A1Error>;

    /// Fetch one policy type with its schema.
    async fn policy_type(&self, type_id: &str) -> Result<PolicyType, A1Error>;

    /// Create or replace a policy instance at the RIC.
    async fn put_policy(&self, policy: &Policy) -> Result<(), A1Error>;

    /// Delete every policy instance at the RIC. Recovery calls this
    /// before re-pushing the local set.
    async fn delete_all_policies(&self) -> Result<(), A1Error>;
}

/// Produces [`A1Client`]s bound to individual RICs.
///
/// Called once per check and per recovery attempt; creation is expected
/// to be cheap and must not block on the remote side. Failures map to
/// [`A1Error::Connect`], which callers treat as "RIC unreachable right
/// now" rather than as drift.
#[async_trait]
pub trait A1ClientFactory: Send + Sync {
    async fn create_client(&self, ric: &Ric) -> Result<Arc<dyn A1Client>, A1Error>;
}
