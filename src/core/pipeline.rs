use crate::adapters::http::ApiFootballClient;
use crate::core::transform;
use crate::core::{
    ConfigProvider, LoadSummary, Pipeline, ScorerSink, Storage, TopScorersResponse,
    TransformResult,
};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Top scorers: API-Football → ranked rows → MySQL (and optionally CSV).
pub struct TopScorersPipeline<K: ScorerSink, S: Storage, C: ConfigProvider> {
    client: ApiFootballClient,
    sink: Option<K>,
    storage: S,
    config: C,
}

impl<K: ScorerSink, S: Storage, C: ConfigProvider> TopScorersPipeline<K, S, C> {
    /// Without a sink the pipeline can still extract and transform (dry runs).
    pub fn new(client: ApiFootballClient, storage: S, config: C) -> Self {
        Self {
            client,
            sink: None,
            storage,
            config,
        }
    }

    pub fn with_sink(mut self, sink: K) -> Self {
        self.sink = Some(sink);
        self
    }

    async fn write_rows(&self, sink: &K, result: &TransformResult) -> Result<u64> {
        sink.ensure_table().await?;
        sink.upsert(&result.rows).await
    }
}

#[async_trait::async_trait]
impl<K: ScorerSink, S: Storage, C: ConfigProvider> Pipeline for TopScorersPipeline<K, S, C> {
    async fn extract(&self) -> Result<TopScorersResponse> {
        tracing::info!(
            "🚀 Extracting top scorers from {} (league={}, season={})",
            self.config.api_endpoint(),
            self.config.league(),
            self.config.season()
        );

        let data = self.client.fetch_top_scorers().await?;

        if data.response.is_empty() {
            return Err(EtlError::NoData {
                league: self.config.league(),
                season: self.config.season(),
            });
        }

        tracing::info!(
            "Data extraction successful ({} scorers). Proceeding to transformation.",
            data.response.len()
        );
        Ok(data)
    }

    async fn transform(&self, data: TopScorersResponse) -> Result<TransformResult> {
        let today = chrono::Local::now().date_naive();
        let result = transform::transform_response(&data, today)?;

        if result.rows.is_empty() {
            return Err(EtlError::NoData {
                league: self.config.league(),
                season: self.config.season(),
            });
        }
        if result.skipped > 0 {
            tracing::warn!("⚠️ Skipped {} entries without statistics", result.skipped);
        }

        tracing::info!("Data transformation successful ({} rows).", result.rows.len());
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<LoadSummary> {
        let sink = self.sink.as_ref().ok_or_else(|| EtlError::ConfigError {
            message: "No database sink configured for loading".to_string(),
        })?;

        tracing::info!("Loading {} rows into `{}`", result.rows.len(), sink.table());

        // 無論成功與否都關閉連線
        let written = self.write_rows(sink, &result).await;
        sink.close().await;
        let rows_affected = written?;

        let csv_path = match self.config.csv_output() {
            Some(file_name) => {
                tracing::debug!("Writing CSV export ({} bytes)", result.csv_output.len());
                self.storage
                    .write_file(file_name, result.csv_output.as_bytes())
                    .await?;
                let path = Path::new(self.config.output_path())
                    .join(file_name)
                    .display()
                    .to_string();
                tracing::info!("📁 CSV export saved to: {}", path);
                Some(path)
            }
            None => None,
        };

        Ok(LoadSummary {
            table: sink.table().to_string(),
            rows_written: result.rows.len(),
            rows_affected,
            csv_path,
        })
    }
}
