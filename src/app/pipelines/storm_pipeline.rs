use crate::adapters::chart::TextBarChart;
use crate::adapters::report::{build_artifacts, Artifact};
use crate::adapters::source::DataSource;
use crate::core::aggregate::aggregate;
use crate::core::rank::rank_all;
use crate::core::transform::transform_all;
use crate::core::{ChartRenderer, ConfigProvider, Pipeline, RawRecord, ReportResult, Storage};
use crate::utils::error::Result;
use std::io::Write;
use std::time::Duration;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Storm events report: reads the dataset, ranks event types by health and
/// economic impact, and writes the charts and write-up.
pub struct StormPipeline<S: Storage, C: ConfigProvider, R: ChartRenderer = TextBarChart> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) renderer: R,
    pub(crate) source: DataSource,
}

impl<S: Storage, C: ConfigProvider> StormPipeline<S, C, TextBarChart> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_renderer(storage, config, TextBarChart::default())
    }
}

impl<S: Storage, C: ConfigProvider, R: ChartRenderer> StormPipeline<S, C, R> {
    pub fn with_renderer(storage: S, config: C, renderer: R) -> Self {
        let source = DataSource::new(Duration::from_secs(config.request_timeout_seconds()));
        Self {
            storage,
            config,
            renderer,
            source,
        }
    }

    fn bundle(artifacts: &[Artifact]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for artifact in artifacts {
            zip.start_file(artifact.name.as_str(), SimpleFileOptions::default())?;
            zip.write_all(&artifact.data)?;
        }
        Ok(zip.finish()?.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: ChartRenderer> Pipeline for StormPipeline<S, C, R> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        self.source
            .load(self.config.source(), &self.config.columns())
            .await
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<ReportResult> {
        let top_n = self.config.top_n();
        let outcome = transform_all(
            &data,
            self.config.bad_row_policy(),
            self.config.missing_category(),
        )?;
        tracing::debug!("Normalized {} rows", outcome.records.len());

        let totals = aggregate(&outcome.records);
        let rankings = rank_all(&totals, top_n)?;

        Ok(ReportResult {
            totals,
            rankings,
            top_n,
            records_processed: outcome.records.len(),
            skipped_rows: outcome.skipped,
            generated_at: chrono::Utc::now(),
        })
    }

    async fn load(&self, result: ReportResult) -> Result<String> {
        let artifacts = build_artifacts(&result, &self.config.output_formats(), &self.renderer)?;
        tracing::debug!("Rendered {} report files", artifacts.len());

        match self.config.archive_name() {
            Some(archive) => {
                let zip_data = Self::bundle(&artifacts)?;
                tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.storage.write_file(&archive, &zip_data).await?;
                Ok(format!("{}/{}", self.config.output_path(), archive))
            }
            None => {
                for artifact in &artifacts {
                    self.storage.write_file(&artifact.name, &artifact.data).await?;
                }
                Ok(self.config.output_path().to_string())
            }
        }
    }
}
