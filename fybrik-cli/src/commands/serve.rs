// fybrik-cli/src/commands/serve.rs
//
// USE CASE: bootstrap the long-running host process. Polls an injected
// `RequestSourcePort` on an interval in place of a CRD watch, mirroring
// `manager/main.go`'s controller-manager bootstrap (flags named verbatim)
// but expressed as the teacher's `run_pipeline`-style application call.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use fybrik_core::application::{
    DefaultConfigPolicyEvaluator, DefaultGovernanceEvaluator, Reconciler, RequestSourcePort,
    SystemClock,
};
use fybrik_core::infrastructure::adapters::{
    InMemoryCatalog, InMemoryStorageAgent, RecordingApplier, StaticPolicyManager, StaticRequestSource,
};
use fybrik_core::infrastructure::config::{load_environment, HostConfig};
use fybrik_core::ports::storage_agent::StorageAgentRegistry;
use tracing::{info, warn};

/// Host-process bootstrap flags, named after `manager/main.go`'s
/// controller-manager flags (spec §6).
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub env: std::path::PathBuf,
    pub metrics_bind_addr: String,
    pub leader_elect: bool,
    pub enable_application_controller: bool,
    pub enable_blueprint_controller: bool,
    pub enable_plotter_controller: bool,
    pub enable_all_controllers: bool,
    pub namespace: String,
    pub max_iterations: Option<u64>,
}

pub async fn execute(options: ServeOptions) -> anyhow::Result<()> {
    let host_config = HostConfig::from_env();

    info!(
        metrics_bind_addr = %options.metrics_bind_addr,
        leader_elect = options.leader_elect,
        namespace = %options.namespace,
        enable_application_controller = options.enable_application_controller,
        enable_blueprint_controller = options.enable_blueprint_controller,
        enable_plotter_controller = options.enable_plotter_controller,
        enable_all_controllers = options.enable_all_controllers,
        system_namespace = %host_config.system_namespace,
        application_namespace = %host_config.application_namespace,
        "bootstrapping host process"
    );

    let environment = load_environment(&options.env)
        .with_context(|| format!("failed to load environment manifest from {:?}", options.env))?;

    let mut registry = StorageAgentRegistry::new();
    for account in environment.storage_accounts() {
        registry.register(Arc::new(InMemoryStorageAgent::new(account.supported_connection.clone())));
    }

    let reconciler = Reconciler::new(
        Arc::new(InMemoryCatalog::new(vec![])),
        Arc::new(DefaultConfigPolicyEvaluator),
        Arc::new(DefaultGovernanceEvaluator::new(Arc::new(StaticPolicyManager::new(vec![])))),
        Arc::new(registry),
        Arc::new(RecordingApplier::default()),
        Arc::new(SystemClock),
    );

    let source: Arc<dyn RequestSourcePort> = Arc::new(StaticRequestSource::new(vec![]));

    let mut iteration: u64 = 0;
    loop {
        if let Some(max) = options.max_iterations {
            if iteration >= max {
                info!(iteration, "reached --max-iterations, shutting down");
                break;
            }
        }

        let pending = source.poll_pending().await?;
        for work in &pending {
            match reconciler.reconcile(&work.request, &work.previous_status, &environment).await {
                Ok(status) => {
                    if let Err(err) = source.save_status(&work.request, &status).await {
                        warn!(error = %err, owner = ?work.request.owner, "failed to persist reconciled status");
                    }
                }
                Err(err) => {
                    warn!(error = %err, owner = ?work.request.owner, "reconciliation pass failed");
                }
            }
        }

        iteration += 1;
        if options.max_iterations.is_some() {
            continue;
        }
        tokio::time::sleep(Duration::from_secs(host_config.connection_timeout().as_secs().min(5))).await;
    }

    Ok(())
}
