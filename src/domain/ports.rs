use crate::domain::model::{BadRowPolicy, ChartSpec, RankedList, RawRecord, ReportResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Header names of the columns the report consumes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub category: String,
    pub fatalities: String,
    pub injuries: String,
    pub property_damage: String,
    pub property_damage_unit: String,
    pub crop_damage: String,
    pub crop_damage_unit: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            category: "EVTYPE".to_string(),
            fatalities: "FATALITIES".to_string(),
            injuries: "INJURIES".to_string(),
            property_damage: "PROPDMG".to_string(),
            property_damage_unit: "PROPDMGEXP".to_string(),
            crop_damage: "CROPDMG".to_string(),
            crop_damage_unit: "CROPDMGEXP".to_string(),
        }
    }
}

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MISSING_CATEGORY: &str = "NA";
pub const DEFAULT_ARCHIVE_NAME: &str = "storm_report.zip";
pub const OUTPUT_FORMATS: [&str; 4] = ["csv", "json", "md", "txt"];

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> &str;
    fn output_path(&self) -> &str;
    fn top_n(&self) -> usize;
    fn bad_row_policy(&self) -> BadRowPolicy;
    fn missing_category(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;

    fn columns(&self) -> ColumnNames {
        ColumnNames::default()
    }

    fn output_formats(&self) -> Vec<String> {
        OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect()
    }

    /// `None` writes every artifact as its own file.
    fn archive_name(&self) -> Option<String> {
        Some(DEFAULT_ARCHIVE_NAME.to_string())
    }
}

/// Draws one ranked list. Rendering style is up to the implementation.
pub trait ChartRenderer: Send + Sync {
    fn file_extension(&self) -> &'static str;
    fn render(&self, spec: &ChartSpec, ranked: &RankedList) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    async fn transform(&self, data: Vec<RawRecord>) -> Result<ReportResult>;
    async fn load(&self, result: ReportResult) -> Result<String>;
}
