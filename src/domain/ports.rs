use crate::domain::model::{LoadSummary, RankedScorer, TopScorersResponse, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// File output for exports.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Destination table for ranked scorers.
#[async_trait]
pub trait ScorerSink: Send + Sync {
    fn table(&self) -> &str;
    async fn ensure_table(&self) -> Result<()>;
    /// Writes all rows atomically and returns the driver's rows-affected total.
    async fn upsert(&self, rows: &[RankedScorer]) -> Result<u64>;
    async fn close(&self);
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn league(&self) -> u32;
    fn season(&self) -> u32;
    fn output_path(&self) -> &str;
    fn csv_output(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<TopScorersResponse>;
    async fn transform(&self, data: TopScorersResponse) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<LoadSummary>;
}
