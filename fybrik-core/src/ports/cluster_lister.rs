// fybrik-core/src/ports/cluster_lister.rs
//
// Component E's collaborator: obtains the cluster fleet used to build an
// `Environment` snapshot, per spec §5 ("Suspension points" lists
// `cluster lister` among the blocking external calls).

use crate::domain::model::Cluster;
use crate::error::FybrikError;
use async_trait::async_trait;

#[async_trait]
pub trait ClusterListerPort: Send + Sync {
    async fn list_clusters(&self) -> Result<Vec<Cluster>, FybrikError>;
}
