use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a pipeline through extract, transform and load, in that order.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting storm damage report");

        let raw_records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", raw_records.len());
        self.monitor.log_stats("Extract");

        let report = self.pipeline.transform(raw_records).await?;
        tracing::info!(
            "Aggregated {} rows into {} event types ({} skipped)",
            report.records_processed,
            report.totals.len(),
            report.skipped_rows.len()
        );
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report written to {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RawRecord, ReportResult};
    use crate::domain::model::CategoryTable;
    use crate::utils::error::EtlError;
    use std::sync::Mutex;

    struct RecordingPipeline {
        calls: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<Vec<RawRecord>> {
            self.calls.lock().unwrap().push("extract");
            Ok(vec![RawRecord::default()])
        }

        async fn transform(&self, data: Vec<RawRecord>) -> Result<ReportResult> {
            self.calls.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(EtlError::data_format(2, "fatalities", "value is missing"));
            }
            Ok(ReportResult {
                totals: CategoryTable::new(),
                rankings: vec![],
                top_n: 10,
                records_processed: data.len(),
                skipped_rows: vec![],
                generated_at: chrono::Utc::now(),
            })
        }

        async fn load(&self, _result: ReportResult) -> Result<String> {
            self.calls.lock().unwrap().push("load");
            Ok("out/storm_report.zip".to_string())
        }
    }

    #[test]
    fn test_runs_phases_in_order() {
        let engine = EtlEngine::new(RecordingPipeline {
            calls: Mutex::new(vec![]),
            fail_transform: false,
        });
        let path = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(path, "out/storm_report.zip");
        assert_eq!(
            *engine.pipeline.calls.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[test]
    fn test_transform_failure_skips_load() {
        let engine = EtlEngine::new(RecordingPipeline {
            calls: Mutex::new(vec![]),
            fail_transform: true,
        });
        let result = tokio_test::block_on(engine.run());
        assert!(matches!(result, Err(EtlError::DataFormat { .. })));
        assert_eq!(
            *engine.pipeline.calls.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
