// fybrik-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Structured reasons the solver can fail to produce a [`Solution`](crate::domain::model::Solution),
/// per spec §4.5 ("Failure"). The solver never logs — it returns one of
/// these and the reconciler classifies it into a status condition.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SolverDiagnostic {
    #[error("No module provides the required endpoint interface for flow '{flow}'")]
    #[diagnostic(code(fybrik::solver::no_endpoint))]
    NoEndpointModule { flow: String },

    #[error("Action '{action}' cannot be assigned to any reachable edge")]
    #[diagnostic(
        code(fybrik::solver::unassignable_action),
        help("No capability in the search space supports this action, directly or via plugins.")
    )]
    UnassignableAction { action: String },

    #[error("No storage account satisfies region requirement for location '{location}'")]
    #[diagnostic(code(fybrik::solver::no_account_in_region))]
    NoAccountInRegion { location: String },

    #[error("Restriction on {restriction_kind} excludes all candidates at depth {depth}")]
    #[diagnostic(code(fybrik::solver::restriction_excludes_all))]
    RestrictionExcludesAll { restriction_kind: String, depth: usize },

    #[error("Interface {source} cannot reach {sink} within {max_hops} hops")]
    #[diagnostic(code(fybrik::solver::interface_unreachable))]
    InterfaceUnreachable {
        source: String,
        sink: String,
        max_hops: usize,
    },

    #[error("Search exhausted at depth {max_depth} without a complete path")]
    #[diagnostic(code(fybrik::solver::search_exhausted))]
    SearchExhausted { max_depth: usize },

    #[error("Governance denied this request: {0}")]
    #[diagnostic(
        code(fybrik::solver::governance_deny),
        help("A 'Deny' action was returned by governance and no module supports it.")
    )]
    GovernanceDeny(String),
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum DomainError {
    #[error("Solver could not find a feasible data path: {0}")]
    #[diagnostic(code(fybrik::domain::infeasible_plan))]
    InfeasiblePlan(#[source] SolverDiagnostic),

    #[error("Invariant violated while building solution: {0}")]
    #[diagnostic(
        code(fybrik::domain::invariant),
        help("This indicates a bug in the solver or blueprint generator, not a bad request.")
    )]
    InvariantViolated(String),

    #[error("Module '{0}' is malformed: {1}")]
    #[diagnostic(code(fybrik::domain::malformed_module))]
    MalformedModule(String, String),

    #[error("Unknown capability kind: {0}")]
    #[diagnostic(code(fybrik::domain::unknown_capability))]
    UnknownCapabilityKind(String),
}
