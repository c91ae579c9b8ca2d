//! ric-supervisor daemon.
//!
//! Loads the fleet file, wires the stores, transport and recovery
//! together, and runs the supervision loop until ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ric_supervisor::a1::{A1ClientFactory, RestClientFactory};
use ric_supervisor::config::{self, AppConfig};
use ric_supervisor::recovery::{RecoveryTask, RicSynchronizer};
use ric_supervisor::repository::{Policies, PolicyTypes, Ric, RicRegistry};
use ric_supervisor::supervision::RicSupervisor;

/// Initialize tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;
    let fleet = config::load_fleet(&config.fleet.fleet_file).with_context(|| {
        format!("failed to load fleet file {}", config.fleet.fleet_file.display())
    })?;

    let rics = Arc::new(RicRegistry::new());
    for declared in fleet {
        rics.register(Ric::new(declared.name, declared.base_url, declared.managed_element_ids));
    }
    if rics.is_empty() {
        tracing::warn!("fleet file lists no rics, supervising an empty fleet");
    }

    let policies = Arc::new(Policies::new());
    let policy_types = Arc::new(PolicyTypes::new());
    let client_factory: Arc<dyn A1ClientFactory> = Arc::new(RestClientFactory::new(
        Duration::from_secs(config.a1.request_timeout_secs),
    )?);
    let recovery: Arc<dyn RecoveryTask> = Arc::new(RicSynchronizer::new(
        rics.clone(),
        policies.clone(),
        policy_types,
        client_factory.clone(),
    ));

    let supervisor = Arc::new(RicSupervisor::new(
        rics.clone(),
        policies,
        client_factory,
        recovery,
        config.supervision.clone(),
    ));
    supervisor.clone().start().await?;
    tracing::info!(rics = rics.len(), "ric-supervisor running, ctrl-c to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    supervisor.stop().await?;
    Ok(())
}
