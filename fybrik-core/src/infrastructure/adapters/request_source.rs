// fybrik-core/src/infrastructure/adapters/request_source.rs
//
// In-process stand-in for a CRD watch: a fixed set of requests handed to
// the host process up front, with status round-tripped in memory. Used by
// `fybrik-cli serve` in place of wiring a Kubernetes client into the core.

use crate::application::reconcile::{Request, RequestStatus};
use crate::application::request_source::{PendingRequest, RequestSourcePort};
use crate::error::FybrikError;
use async_trait::async_trait;
use std::sync::Mutex;

struct Entry {
    request: Request,
    status: RequestStatus,
}

pub struct StaticRequestSource {
    entries: Mutex<Vec<Entry>>,
}

impl StaticRequestSource {
    pub fn new(requests: Vec<Request>) -> Self {
        let entries = requests
            .into_iter()
            .map(|request| Entry { request, status: RequestStatus::new() })
            .collect();
        Self { entries: Mutex::new(entries) }
    }
}

#[async_trait]
impl RequestSourcePort for StaticRequestSource {
    async fn poll_pending(&self) -> Result<Vec<PendingRequest>, FybrikError> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries
            .iter()
            .map(|e| PendingRequest { request: e.request.clone(), previous_status: e.status.clone() })
            .collect())
    }

    async fn save_status(&self, request: &Request, status: &RequestStatus) -> Result<(), FybrikError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(entry) = entries
            .iter_mut()
            .find(|e| e.request.owner == request.owner)
        {
            entry.status = status.clone();
        }
        Ok(())
    }
}
