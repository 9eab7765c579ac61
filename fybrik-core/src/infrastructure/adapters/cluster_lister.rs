// fybrik-core/src/infrastructure/adapters/cluster_lister.rs

use crate::domain::model::Cluster;
use crate::error::FybrikError;
use crate::ports::cluster_lister::ClusterListerPort;
use async_trait::async_trait;

/// Returns a fixed fleet, standing in for a multicluster-group API call.
pub struct StaticClusterLister {
    clusters: Vec<Cluster>,
}

impl StaticClusterLister {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }
}

#[async_trait]
impl ClusterListerPort for StaticClusterLister {
    async fn list_clusters(&self) -> Result<Vec<Cluster>, FybrikError> {
        Ok(self.clusters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn returns_the_configured_fleet() {
        let lister = StaticClusterLister::new(vec![Cluster {
            name: "eu-1".into(),
            metadata: HashMap::new(),
        }]);
        let clusters = lister.list_clusters().await.unwrap();
        assert_eq!(clusters.len(), 1);
    }
}
