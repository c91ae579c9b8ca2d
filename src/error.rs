//! Typed errors for the supervision engine.
//!
//! The taxonomy deliberately keeps transport failures apart from recovery
//! failures: a failed A1 query abandons the current check and leaves the
//! RIC state untouched, while a failed recovery is terminal for that
//! attempt and moves the RIC to `Unavailable`.

use thiserror::Error;

/// Failures surfaced by A1 transport clients.
///
/// Both variants are transient from the engine's point of view. A check
/// that hits one is abandoned without a state change and the RIC is
/// looked at again on the next supervision sweep.
#[derive(Debug, Clone, Error)]
pub enum A1Error {
    /// Client acquisition failed before any request went out.
    #[error("connect to ric {ric} failed: {reason}")]
    Connect { ric: String, reason: String },

    /// A live query against the RIC failed, either at the transport
    /// level or because the RIC answered with an error status.
    #[error("query on ric {ric} failed: {reason}")]
    Remote { ric: String, reason: String },
}

impl A1Error {
    pub fn connect(ric: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connect { ric: ric.into(), reason: reason.to_string() }
    }

    pub fn remote(ric: impl Into<String>, reason: impl ToString) -> Self {
        Self::Remote { ric: ric.into(), reason: reason.to_string() }
    }

    /// Name of the RIC the failed operation was aimed at.
    pub fn ric(&self) -> &str {
        match self {
            Self::Connect { ric, .. } | Self::Remote { ric, .. } => ric,
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }
}

/// Failures owned by the recovery procedure.
///
/// Never propagated back into the supervision pipeline; the synchronizer
/// logs them and maps the attempt to an `Unavailable` transition.
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error(transparent)]
    Client(#[from] A1Error),

    /// The RIC was removed from the registry while its recovery ran.
    #[error("ric {0} is no longer registered")]
    RicVanished(String),
}
