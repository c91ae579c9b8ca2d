//! Drift detection and the periodic sweep that drives it.
//!
//! Layer cake, top down: [`RicSupervisor`] owns the timer and the
//! per-sweep fan-out, [`RicChecker`] runs the per-RIC pipeline, and the
//! registry compare-and-set underneath resolves every race about who
//! gets to recover a RIC.

mod checker;
mod config;
mod supervisor;

pub use checker::{policy_view_drifted, type_view_drifted, CheckOutcome, RecoveryReason, RicChecker};
pub use config::SupervisionConfig;
pub use supervisor::{RicSupervisor, SweepReport};
