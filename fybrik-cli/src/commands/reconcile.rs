// fybrik-cli/src/commands/reconcile.rs
//
// USE CASE: drive one synchronous reconciliation pass.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use comfy_table::Table;
use fybrik_core::application::{
    DefaultConfigPolicyEvaluator, DefaultGovernanceEvaluator, Reconciler, Request, RequestPhase,
    RequestStatus, SystemClock,
};
use fybrik_core::infrastructure::adapters::{
    InMemoryCatalog, InMemoryStorageAgent, RecordingApplier, StaticPolicyManager,
};
use fybrik_core::infrastructure::config::load_environment;
use fybrik_core::ports::storage_agent::StorageAgentRegistry;

pub async fn execute(env: PathBuf, request: PathBuf) -> anyhow::Result<()> {
    let environment = load_environment(&env)
        .with_context(|| format!("failed to load environment manifest from {:?}", env))?;

    let content = std::fs::read_to_string(&request)
        .with_context(|| format!("failed to read request file {:?}", request))?;
    let request: Request = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse request YAML from {:?}", request))?;

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

    let previous = RequestStatus::new();
    let status = reconciler.reconcile(&request, &previous, &environment).await?;

    println!("phase: {:?}  ready: {}", status.phase, status.ready);
    println!("generated: {}", status.generated.is_some());
    println!("provisioned storage entries: {}", status.provisioned_storage.len());

    let mut table = Table::new();
    table.set_header(vec![
        "dataset",
        "condition",
        "status",
        "reason",
        "message",
        "cataloged",
        "endpoint",
    ]);
    for asset_status in status.asset_states.values() {
        let cataloged = asset_status.cataloged_asset.clone().unwrap_or_default();
        let endpoint = asset_status
            .endpoint
            .as_ref()
            .map(|e| format!("{}://{}:{}", e.protocol, e.hostname, e.port))
            .unwrap_or_default();
        for condition in &asset_status.conditions {
            table.add_row(vec![
                asset_status.dataset_id.clone(),
                condition.kind.clone(),
                condition.status.to_string(),
                condition.reason.clone(),
                condition.message.clone(),
                cataloged.clone(),
                endpoint.clone(),
            ]);
        }
    }
    println!("{table}");

    if !status.ready && status.phase == RequestPhase::Failed {
        std::process::exit(1);
    }

    Ok(())
}
