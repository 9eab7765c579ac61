// fybrik-core/src/application/request_source.rs
//
// The host process's watch-loop collaborator. In production this would be
// a CRD informer; here it is a narrow poll contract so `fybrik-cli serve`
// never depends on a Kubernetes client directly, mirroring how the
// teacher keeps `Connector` behind a port rather than importing DuckDB
// into the CLI.

use crate::application::reconcile::{Request, RequestStatus};
use crate::error::FybrikError;
use async_trait::async_trait;

/// One unit of pending work: a request paired with its last-known status
/// (`RequestStatus::new()` for a request the host has never seen).
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub request: Request,
    pub previous_status: RequestStatus,
}

/// Polled on an interval by the host process in place of a CRD watch.
#[async_trait]
pub trait RequestSourcePort: Send + Sync {
    async fn poll_pending(&self) -> Result<Vec<PendingRequest>, FybrikError>;

    /// Persists the status the reconciler computed, so the next
    /// `poll_pending` call reflects it (the analogue of a CRD status
    /// subresource update).
    async fn save_status(&self, request: &Request, status: &RequestStatus) -> Result<(), FybrikError>;
}
