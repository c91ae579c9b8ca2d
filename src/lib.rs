// Library exports for ric-supervisor
//
// The reconciliation engine that keeps the local view of a RIC fleet
// consistent with the fleet's true remote state.

pub mod a1;
pub mod config;
pub mod error;
pub mod recovery;
pub mod repository;
pub mod supervision;

// Re-export the domain types most callers touch
pub use repository::{Policies, Policy, PolicyType, PolicyTypes, Ric, RicRegistry, RicState};

// Re-export the engine entry points for convenience
pub use recovery::{RecoveryTask, RicSynchronizer};
pub use supervision::{RicSupervisor, SupervisionConfig, SweepReport};
