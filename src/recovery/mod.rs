//! Recovery of drifted RICs.
//!
//! The supervision pipeline decides *that* a RIC needs repair; this
//! module owns *how*. The split keeps the pipeline non-blocking: a
//! trigger returns immediately and the repair runs in its own task.

mod synchronizer;

pub use synchronizer::RicSynchronizer;

use crate::repository::Ric;

/// Seam between drift detection and repair.
///
/// `recover` is fire-and-forget: implementations spawn their own work
/// and return without waiting for it. The caller has already moved the
/// RIC to `Recovering`; the implementation must make sure the RIC does
/// not stay there forever, whatever the outcome. Re-invocation while a
/// recovery for the same RIC is still running must be a no-op.
pub trait RecoveryTask: Send + Sync {
    fn recover(&self, ric: &Ric);
}
