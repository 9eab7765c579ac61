// fybrik-core/src/application/reconcile.rs
//
// Component H: the Reconciler, per spec §4.7. Pure with respect to
// wall-clock/threads — callers inject a [`Clock`] and drive this from an
// async worker pool (the CLI crate's `serve` command does that); this
// module only holds the per-request state machine and its one-shot
// transition function.
//
// Finalizer/cleanup semantics are generalized from
// `manager/controllers/app/m4dapplication_controller.go`'s Kubernetes
// `controllerutil` finalizer pattern into a plain `finalizer_present: bool`
// field, per SPEC_FULL's supplemented features.

use crate::domain::environment::Environment;
use crate::domain::error::SolverDiagnostic;
use crate::domain::model::{AssetDetails, DataContext, DataInfo, Solution, StorageAccount};
use crate::domain::solver::PathSolver;
use crate::domain::taxonomy::{FlowType, Interface, Protocol};
use crate::domain::blueprint::{BlueprintGenerator, RequestOwner};
use crate::error::FybrikError;
use crate::ports::applier::{ApplierPort, GeneratedRef, OwnerRef};
use crate::ports::catalog::{AssetConnection, AssetMetadata, AssetSpec, CatalogPort};
use crate::ports::storage_agent::{ApplicationDetails, StorageAgentRegistry, StorageOptions};
use crate::application::config_policy::{ConfigPolicyEvaluator, ConfigPolicyRequest};
use crate::application::governance::{GovernanceEvaluator, GovernanceRequest};
use crate::application::storage_provision::{ProvisionContext, ProvisionedStorageEntry, StorageProvisioner};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Where a request sits in the state machine of spec §4.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    New,
    Planning,
    Deploying,
    Ready,
    Denied,
    Failed,
    Retrying,
    Terminating,
}

/// A terminal or informational condition, per spec §6 ("Response surface").
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub kind: String,
    pub status: bool,
    pub reason: String,
    pub message: String,
}

impl Condition {
    pub fn ready() -> Self {
        Self {
            kind: "Ready".into(),
            status: true,
            reason: "Ready".into(),
            message: "asset is ready".into(),
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self {
            kind: "Deny".into(),
            status: true,
            reason: "GovernanceDeny".into(),
            message: message.into(),
        }
    }

    pub fn error(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: "Error".into(),
            status: true,
            reason: reason.into(),
            message: message.into(),
        }
    }
}

/// One asset's request context, per spec §6's `spec.data[]`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRequest {
    pub dataset_id: String,
    pub flow: FlowType,
    pub requested_interface: Interface,
    pub is_new_data_set: bool,
}

/// One reconcilable request (the analogue of a `FybrikApplication` CR).
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub owner: RequestOwner,
    pub workload_cluster: String,
    #[serde(default)]
    pub app_info: HashMap<String, String>,
    pub assets: Vec<AssetRequest>,
    #[serde(default)]
    pub spec_generation: u64,
    #[serde(default)]
    pub finalizer_present: bool,
    #[serde(default)]
    pub deleted: bool,
}

/// The workload-facing connection for a resolved read, per spec §6
/// ("endpoint: hostname, port, protocol-specific connection map").
/// `hostname`/`port` are filled in by the applier once the module is
/// actually deployed; the core only knows the interface it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub hostname: String,
    pub port: u16,
    pub protocol: Protocol,
    pub connection_map: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetStatus {
    pub dataset_id: String,
    pub conditions: Vec<Condition>,
    /// The catalog identifier returned by `CatalogPort::create_asset`,
    /// set once a new-data-set write reaches `Ready` (spec §4.7).
    pub cataloged_asset: Option<String>,
    pub endpoint: Option<Endpoint>,
}

/// The observed status of one request, round-tripped by the caller
/// between reconciliations.
#[derive(Debug, Clone)]
pub struct RequestStatus {
    pub phase: RequestPhase,
    pub observed_generation: u64,
    pub asset_states: HashMap<String, AssetStatus>,
    pub generated: Option<GeneratedRef>,
    pub provisioned_storage: Vec<ProvisionedStorageEntry>,
    pub ready: bool,
}

impl RequestStatus {
    pub fn new() -> Self {
        Self {
            phase: RequestPhase::New,
            observed_generation: 0,
            asset_states: HashMap::new(),
            generated: None,
            provisioned_storage: vec![],
            ready: false,
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Injected wall-clock, per spec §9 ("Global state: none inside the
/// core"). The reconciler never calls `Utc::now()` directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> chrono::DateTime<chrono::Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}

enum PlanAssetError {
    Denied(String),
    Infeasible(String),
    Transient(FybrikError),
}

impl From<FybrikError> for PlanAssetError {
    fn from(e: FybrikError) -> Self {
        PlanAssetError::Transient(e)
    }
}

struct PlannedAsset {
    edges: Vec<crate::domain::model::ResolvedEdge>,
    status: AssetStatus,
}

/// Drives one request: `(C, D) → Solver → Generator → Applier`, per
/// spec §4.7's transition table.
pub struct Reconciler {
    catalog: Arc<dyn CatalogPort>,
    config_policy: Arc<dyn ConfigPolicyEvaluator>,
    governance: Arc<dyn GovernanceEvaluator>,
    storage_registry: Arc<StorageAgentRegistry>,
    applier: Arc<dyn ApplierPort>,
    clock: Arc<dyn Clock>,
}

impl Reconciler {
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        config_policy: Arc<dyn ConfigPolicyEvaluator>,
        governance: Arc<dyn GovernanceEvaluator>,
        storage_registry: Arc<StorageAgentRegistry>,
        applier: Arc<dyn ApplierPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            config_policy,
            governance,
            storage_registry,
            applier,
            clock,
        }
    }

    pub async fn reconcile(
        &self,
        request: &Request,
        previous: &RequestStatus,
        env: &Environment,
    ) -> Result<RequestStatus, FybrikError> {
        let _ = self.clock.now(); // stamped by the caller onto conditions it persists

        if request.deleted {
            return self.terminate(previous).await;
        }

        if previous.generated.is_some() && previous.observed_generation == request.spec_generation {
            return self.poll(request, previous).await;
        }

        self.plan_and_deploy(request, previous, env).await
    }

    async fn plan_and_deploy(
        &self,
        request: &Request,
        previous: &RequestStatus,
        env: &Environment,
    ) -> Result<RequestStatus, FybrikError> {
        let mut asset_states = HashMap::new();
        let mut edges = Vec::new();
        let mut phase = RequestPhase::Planning;

        for asset in &request.assets {
            match self.plan_asset(request, asset, env).await {
                Ok(planned) => {
                    edges.extend(planned.edges);
                    asset_states.insert(asset.dataset_id.clone(), planned.status);
                }
                Err(PlanAssetError::Denied(message)) => {
                    phase = RequestPhase::Denied;
                    asset_states.insert(
                        asset.dataset_id.clone(),
                        AssetStatus {
                            dataset_id: asset.dataset_id.clone(),
                            conditions: vec![Condition::deny(message)],
                            cataloged_asset: None,
                            endpoint: None,
                        },
                    );
                }
                Err(PlanAssetError::Infeasible(message)) => {
                    if phase != RequestPhase::Denied {
                        phase = RequestPhase::Failed;
                    }
                    asset_states.insert(
                        asset.dataset_id.clone(),
                        AssetStatus {
                            dataset_id: asset.dataset_id.clone(),
                            conditions: vec![Condition::error("InfeasiblePlan", message)],
                            cataloged_asset: None,
                            endpoint: None,
                        },
                    );
                }
                Err(PlanAssetError::Transient(_)) => {
                    return Ok(RequestStatus {
                        phase: RequestPhase::Retrying,
                        ..previous.clone()
                    });
                }
            }
        }

        if matches!(phase, RequestPhase::Denied | RequestPhase::Failed) {
            return Ok(RequestStatus {
                phase,
                asset_states,
                observed_generation: previous.observed_generation,
                generated: previous.generated.clone(),
                provisioned_storage: previous.provisioned_storage.clone(),
                ready: false,
            });
        }

        let solution = Solution { edges };
        let provisioner = StorageProvisioner::new(&self.storage_registry);
        let owner_label = request.owner.label();
        let app_details = ApplicationDetails {
            namespace: request.owner.namespace.clone(),
            name: request.owner.name.clone(),
            uuid: owner_label.clone(),
        };
        let accounts: Vec<StorageAccount> = env.storage_accounts().to_vec();
        let connection_type_for = |supported_connection: &str| supported_connection.to_string();
        let secret_ref_for = |account_name: &str| {
            accounts
                .iter()
                .find(|a| a.name == account_name)
                .map(|a| a.secret_ref.clone())
                .unwrap_or_default()
        };
        let ctx = ProvisionContext {
            owner_label: &owner_label,
            dataset_id: "request",
            app_details: &app_details,
            accounts: &accounts,
            connection_type_for: &connection_type_for,
            secret_ref_for: &secret_ref_for,
        };
        let provisioned = match provisioner.reconcile(&solution, &previous.provisioned_storage, &ctx).await {
            Ok(p) => p,
            Err(_) => {
                return Ok(RequestStatus {
                    phase: RequestPhase::Retrying,
                    ..previous.clone()
                });
            }
        };

        // §4.7: the generator only runs once every allocation is observed
        // Provisioned. A freshly-allocated connection that hasn't settled
        // yet (or an agent that errors on the poll) retries this whole
        // pass rather than generating against a half-provisioned solution.
        let mut all_provisioned = true;
        for entry in &provisioned {
            let observed = match self.storage_registry.get(&entry.connection.connection_type) {
                Ok(agent) => agent.status(&entry.connection).await,
                Err(e) => Err(e),
            };
            if !matches!(observed, Ok(status) if status.provisioned) {
                all_provisioned = false;
                break;
            }
        }
        if !all_provisioned {
            return Ok(RequestStatus {
                phase: RequestPhase::Retrying,
                asset_states,
                provisioned_storage: provisioned,
                observed_generation: previous.observed_generation,
                generated: previous.generated.clone(),
                ready: false,
            });
        }

        let blueprints = BlueprintGenerator::generate(&solution, &request.owner, "fybrik-modules");
        let owner_ref = OwnerRef {
            namespace: request.owner.namespace.clone(),
            name: request.owner.name.clone(),
        };
        let generated = match self
            .applier
            .create_or_update(&owner_ref, &owner_label, &blueprints)
            .await
        {
            Ok(g) => g,
            Err(_) => {
                return Ok(RequestStatus {
                    phase: RequestPhase::Retrying,
                    ..previous.clone()
                });
            }
        };

        Ok(RequestStatus {
            phase: RequestPhase::Deploying,
            observed_generation: request.spec_generation,
            asset_states,
            generated: Some(generated),
            provisioned_storage: provisioned,
            ready: false,
        })
    }

    async fn poll(&self, request: &Request, previous: &RequestStatus) -> Result<RequestStatus, FybrikError> {
        let Some(reference) = &previous.generated else {
            return Ok(previous.clone());
        };
        match self.applier.get(reference).await {
            Ok(status) if status.ready => {
                if previous.ready {
                    // Already handled the ready transition on an earlier
                    // pass; re-cataloging/re-persisting here would be a
                    // no-op at best and a double-registration at worst.
                    return Ok(RequestStatus {
                        phase: RequestPhase::Ready,
                        ready: true,
                        ..previous.clone()
                    });
                }
                self.register_ready_assets(request, previous).await
            }
            Ok(_) => Ok(RequestStatus {
                phase: RequestPhase::Retrying,
                ..previous.clone()
            }),
            Err(_) => Ok(RequestStatus {
                phase: RequestPhase::Retrying,
                ..previous.clone()
            }),
        }
    }

    /// The once-per-request ready transition, per spec §4.7 and
    /// `checkReadiness` (`original_source/manager/controllers/app/m4dapplication_controller.go:130`):
    /// every new-data-set asset gets cataloged and its storage marked
    /// persistent before the request is reported `Ready`. Per the §9 Open
    /// Question, a catalog failure does not revert the storage allocation
    /// that produced it — the asset simply stays uncataloged and the
    /// request still becomes ready.
    async fn register_ready_assets(
        &self,
        request: &Request,
        previous: &RequestStatus,
    ) -> Result<RequestStatus, FybrikError> {
        let mut asset_states = previous.asset_states.clone();
        let mut provisioned = previous.provisioned_storage.clone();

        for asset in &request.assets {
            if !asset.is_new_data_set {
                continue;
            }
            let Some(entry) = provisioned.iter_mut().find(|e| e.dataset_id == asset.dataset_id) else {
                continue;
            };

            let cataloged = self
                .catalog
                .create_asset(&AssetSpec {
                    dataset_id: asset.dataset_id.clone(),
                    metadata: AssetMetadata {
                        name: asset.dataset_id.clone(),
                        owner: None,
                        geography: String::new(),
                        tags: HashMap::new(),
                        columns: vec![],
                    },
                    connection: AssetConnection {
                        interface: asset.requested_interface.clone(),
                        properties: entry.connection.properties.clone(),
                        secret_ref: String::new(),
                    },
                })
                .await
                .ok();

            if let Ok(agent) = self.storage_registry.get(&entry.connection.connection_type) {
                let _ = agent.set_persistent(&entry.connection, true).await;
            }
            entry.persistent = true;

            if let Some(state) = asset_states.get_mut(&asset.dataset_id) {
                state.cataloged_asset = cataloged;
            }
        }

        Ok(RequestStatus {
            phase: RequestPhase::Ready,
            ready: true,
            asset_states,
            provisioned_storage: provisioned,
            ..previous.clone()
        })
    }

    async fn terminate(&self, previous: &RequestStatus) -> Result<RequestStatus, FybrikError> {
        let mut kept = Vec::new();
        for entry in &previous.provisioned_storage {
            if entry.persistent {
                kept.push(entry.clone());
                continue;
            }
            if let Ok(agent) = self.storage_registry.get(&entry.connection.connection_type) {
                let opts = StorageOptions {
                    app_details: ApplicationDetails {
                        namespace: String::new(),
                        name: String::new(),
                        uuid: String::new(),
                    },
                    dataset_details: Default::default(),
                    config_opts: Default::default(),
                };
                agent.delete(&entry.connection, &opts).await?;
            }
        }

        if let Some(reference) = &previous.generated {
            self.applier.delete(reference).await?;
        }

        Ok(RequestStatus {
            phase: RequestPhase::Terminating,
            generated: None,
            provisioned_storage: kept,
            ready: false,
            ..previous.clone()
        })
    }

    async fn plan_asset(
        &self,
        request: &Request,
        asset: &AssetRequest,
        env: &Environment,
    ) -> Result<PlannedAsset, PlanAssetError> {
        let asset_info = if asset.is_new_data_set {
            None
        } else {
            Some(self.catalog.get_asset_info(&asset.dataset_id, asset.flow).await?)
        };

        let asset_geography = asset_info.as_ref().map(|a| a.metadata.geography.clone());
        let asset_tags = asset_info.as_ref().map(|a| a.metadata.tags.clone()).unwrap_or_default();

        let usage: HashSet<FlowType> = [asset.flow].into_iter().collect();
        let config_request = ConfigPolicyRequest {
            dataset_id: asset.dataset_id.clone(),
            usage,
            asset_geography: asset_geography.clone(),
            required_action_count: 0, // refined below once governance has run
            workload_cluster: request.workload_cluster.clone(),
        };
        // Governance runs first so its action count can inform the
        // config-policy evaluator's cross-region copy rule (§9
        // supplemented features), then config-policy runs against that count.
        let candidate_regions: Vec<String> = env
            .clusters()
            .iter()
            .filter_map(|c| c.region().map(str::to_string))
            .collect();
        let governance_request = GovernanceRequest {
            dataset_id: asset.dataset_id.clone(),
            flow: asset.flow,
            asset_tags,
            app_info: request.app_info.clone(),
            asset_geography: asset_geography.clone(),
            candidate_regions,
        };
        let governance_output = self.governance.actions(&governance_request).await?;

        let config_request = ConfigPolicyRequest {
            required_action_count: governance_output.required_actions.len(),
            ..config_request
        };
        let config_output = self
            .config_policy
            .evaluate(&config_request, env)
            .map_err(PlanAssetError::from)?;

        let data_info = DataInfo {
            context: DataContext {
                dataset_id: asset.dataset_id.clone(),
                flow: asset.flow,
                requested_interface: asset.requested_interface.clone(),
                is_new_data_set: asset.is_new_data_set,
                workload_cluster: request.workload_cluster.clone(),
            },
            asset_details: asset_info.map(|a| AssetDetails {
                current_interface: a.connection.interface,
                geography: a.metadata.geography,
            }),
            required_actions: governance_output.required_actions,
            storage_actions_by_location: governance_output.storage_actions_by_location,
            configuration: config_output.decisions,
        };

        match PathSolver::solve(env, &data_info) {
            Ok(solution) => {
                let endpoint = solution.edges.last().and_then(|edge| {
                    edge.sink_interface.as_ref().map(|sink| Endpoint {
                        hostname: String::new(),
                        port: 0,
                        protocol: sink.protocol.clone(),
                        connection_map: [("format".to_string(), sink.format.to_string())].into(),
                    })
                });
                Ok(PlannedAsset {
                    edges: solution.edges,
                    status: AssetStatus {
                        dataset_id: asset.dataset_id.clone(),
                        conditions: vec![Condition::ready()],
                        cataloged_asset: None,
                        endpoint,
                    },
                })
            }
            Err(SolverDiagnostic::UnassignableAction { action }) if action == "Deny" => {
                Err(PlanAssetError::Denied("governance denied this request".to_string()))
            }
            Err(diag) => Err(PlanAssetError::Infeasible(diag.to_string())),
        }
    }
}
