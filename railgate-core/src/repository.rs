use async_trait::async_trait;

use crate::train::TrainOption;

/// Repository trait for route search
#[async_trait]
pub trait TrainDirectory: Send + Sync {
    async fn find_by_route(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Vec<TrainOption>, Box<dyn std::error::Error + Send + Sync>>;
}
