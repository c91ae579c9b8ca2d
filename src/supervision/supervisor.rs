//! Fleet-wide supervision scheduler.
//!
//! Drives the reconciliation engine: a timer fires every
//! `interval_secs`, each firing snapshots the registry and fans one
//! check task out per RIC. Sweeps run detached from the timer loop, so
//! a slow fleet never delays the next firing; overlap is harmless
//! because every state change goes through the registry compare-and-set.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{Notify, RwLock};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::a1::A1ClientFactory;
use crate::recovery::RecoveryTask;
use crate::repository::{Policies, RicRegistry};

use super::checker::{CheckOutcome, RicChecker};
use super::config::SupervisionConfig;

/// Counts from one supervision sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// RICs whose local view matched remote state.
    pub checked: usize,
    /// Recoveries triggered this sweep.
    pub recoveries: usize,
    /// Checks skipped because a recovery was in flight or a race lost.
    pub skipped: usize,
    /// Checks abandoned on transport failure or timeout.
    pub abandoned: usize,
    /// Check tasks that panicked or were torn down by the runtime.
    pub failed: usize,
}

impl SweepReport {
    fn record(&mut self, outcome: &CheckOutcome) {
        match outcome {
            CheckOutcome::Checked => self.checked += 1,
            CheckOutcome::RecoveryStarted(_) => self.recoveries += 1,
            CheckOutcome::Skipped => self.skipped += 1,
            CheckOutcome::Abandoned(_) => self.abandoned += 1,
        }
    }
}

/// Periodic driver of the reconciliation engine.
///
/// Start with [`RicSupervisor::start`] on an `Arc`; stop with
/// [`RicSupervisor::stop`]. A sweep can also be run directly through
/// [`RicSupervisor::check_all_rics`], which is what the loop does on
/// every firing.
pub struct RicSupervisor {
    rics: Arc<RicRegistry>,
    checker: RicChecker,
    config: SupervisionConfig,
    shutdown: Notify,
    tasks: RwLock<Vec<JoinHandle<()>>>,
}

impl RicSupervisor {
    pub fn new(
        rics: Arc<RicRegistry>,
        policies: Arc<Policies>,
        client_factory: Arc<dyn A1ClientFactory>,
        recovery: Arc<dyn RecoveryTask>,
        config: SupervisionConfig,
    ) -> Self {
        let checker = RicChecker::new(rics.clone(), policies, client_factory, recovery);
        Self {
            rics,
            checker,
            config,
            shutdown: Notify::new(),
            tasks: RwLock::new(Vec::new()),
        }
    }

    /// Start the periodic supervision loop.
    ///
    /// The supervisor must be wrapped in `Arc` to enable spawning the
    /// background task.
    pub async fn start(self: Arc<Self>) -> Result<()> {
        let supervisor = self.clone();
        let handle = tokio::spawn(async move {
            supervisor.supervision_loop().await;
        });
        self.tasks.write().await.push(handle);

        info!(interval_secs = self.config.interval_secs, "ric supervision started");
        Ok(())
    }

    /// Stop the loop and wait for it to wind down. Sweeps and recoveries
    /// already in flight keep running on the runtime until they finish.
    pub async fn stop(&self) -> Result<()> {
        self.shutdown.notify_waiters();

        let mut tasks = self.tasks.write().await;
        for handle in tasks.drain(..) {
            let _ = handle.await;
        }

        info!("ric supervision stopped");
        Ok(())
    }

    async fn supervision_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    // Detached: the timer never waits for a sweep.
                    let supervisor = self.clone();
                    tokio::spawn(async move {
                        supervisor.check_all_rics().await;
                    });
                }
                _ = self.shutdown.notified() => {
                    debug!("supervision loop shutting down");
                    break;
                }
            }
        }
    }

    /// One sweep over the whole fleet.
    ///
    /// Every registered RIC gets its own check task; one RIC panicking
    /// or hanging never stops the others, it only shows up in the
    /// report. Completion order is whatever the runtime gives us.
    pub async fn check_all_rics(&self) -> SweepReport {
        let snapshot = self.rics.snapshot();
        debug!(rics = snapshot.len(), "supervision sweep starting");

        let check_timeout = Duration::from_secs(self.config.check_timeout_secs);
        let mut checks = JoinSet::new();
        for ric in snapshot {
            let checker = self.checker.clone();
            checks.spawn(async move {
                let name = ric.name.clone();
                (name, timeout(check_timeout, checker.check_ric(&ric)).await)
            });
        }

        let mut report = SweepReport::default();
        while let Some(joined) = checks.join_next().await {
            match joined {
                Ok((_, Ok(outcome))) => report.record(&outcome),
                Ok((name, Err(_))) => {
                    warn!(
                        ric = %name,
                        timeout_secs = self.config.check_timeout_secs,
                        "ric check timed out"
                    );
                    report.abandoned += 1;
                }
                Err(e) => {
                    error!(error = %e, "ric check task failed");
                    report.failed += 1;
                }
            }
        }

        debug!(
            checked = report.checked,
            recoveries = report.recoveries,
            skipped = report.skipped,
            abandoned = report.abandoned,
            failed = report.failed,
            "supervision sweep completed"
        );
        report
    }
}
