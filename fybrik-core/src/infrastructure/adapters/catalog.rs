// fybrik-core/src/infrastructure/adapters/catalog.rs
//
// A fixed-table catalog adapter, standing in for the rego-backed Katalog
// connector. Populated at construction time; `create_asset` records the
// newly-registered spec rather than persisting it anywhere real.

use crate::domain::taxonomy::FlowType;
use crate::error::FybrikError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::catalog::{AssetSpec, CatalogPort};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryCatalog {
    assets: Mutex<HashMap<String, AssetSpec>>,
}

impl InMemoryCatalog {
    pub fn new(seed: Vec<AssetSpec>) -> Self {
        let assets = seed.into_iter().map(|a| (a.dataset_id.clone(), a)).collect();
        Self {
            assets: Mutex::new(assets),
        }
    }
}

#[async_trait]
impl CatalogPort for InMemoryCatalog {
    async fn get_asset_info(&self, dataset_id: &str, _operation: FlowType) -> Result<AssetSpec, FybrikError> {
        self.assets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(dataset_id)
            .cloned()
            .ok_or_else(|| InfrastructureError::Catalog(format!("unknown dataset '{dataset_id}'")).into())
    }

    async fn create_asset(&self, spec: &AssetSpec) -> Result<String, FybrikError> {
        let mut assets = self.assets.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        assets.insert(spec.dataset_id.clone(), spec.clone());
        Ok(spec.dataset_id.clone())
    }
}
