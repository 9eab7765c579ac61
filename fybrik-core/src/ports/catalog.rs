// fybrik-core/src/ports/catalog.rs
//
// Component B: the catalog façade, per spec §6's `GetAssetInfo`/`CreateAsset`
// contract. DTOs are modeled after `connectors/katalog/pkg/api/types.go`
// rather than the thinner `spec.md` sketch, per SPEC_FULL's supplemented
// features — the full tag/column shape is what drives governance.

use crate::domain::taxonomy::{FlowType, Interface};
use crate::error::FybrikError;
use async_trait::async_trait;
use std::collections::HashMap;

/// One catalog-tracked column, with governance tags (e.g. `PII: true`).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub tags: HashMap<String, String>,
}

/// Descriptive metadata about an asset: ownership, geography, tags.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMetadata {
    pub name: String,
    pub owner: Option<String>,
    pub geography: String,
    pub tags: HashMap<String, String>,
    pub columns: Vec<Column>,
}

/// The asset's physical connection, per spec §3 `AssetDetails`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetConnection {
    pub interface: Interface,
    pub properties: HashMap<String, String>,
    pub secret_ref: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    pub dataset_id: String,
    pub metadata: AssetMetadata,
    pub connection: AssetConnection,
}

/// Component B's catalog contract. Returned errors should use
/// [`FybrikError::Infrastructure`]'s `Catalog` variant so the reconciler's
/// error-taxonomy classification (spec §7) can recognize them.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    async fn get_asset_info(
        &self,
        dataset_id: &str,
        operation: FlowType,
    ) -> Result<AssetSpec, FybrikError>;

    /// Registers a newly-written asset. Per spec §9's Open Question, a
    /// failure here does not revert the storage allocation that produced
    /// it — the caller surfaces an Error condition instead.
    async fn create_asset(&self, spec: &AssetSpec) -> Result<String, FybrikError>;
}
