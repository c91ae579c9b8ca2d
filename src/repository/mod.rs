//! Local view of the fleet: RICs, policies, and policy types.
//!
//! These stores hold what the engine believes the world looks like. The
//! supervision pipeline reads them, compares against live RIC state, and
//! recovery rewrites them when the two disagree.

mod policy;
mod policy_type;
mod registry;
mod ric;

pub use policy::{Policies, Policy, PolicyIdSnapshot};
pub use policy_type::{PolicyType, PolicyTypes};
pub use registry::{RicRegistry, TransitionOutcome};
pub use ric::{Ric, RicState};
