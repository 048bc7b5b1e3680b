use crate::core::ConfigProvider;
use crate::domain::model::BadRowPolicy;
use crate::domain::ports::{DEFAULT_MISSING_CATEGORY, DEFAULT_TOP_N};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "storm-etl")]
#[command(about = "Ranks storm event types by health and economic impact")]
pub struct CliConfig {
    /// Dataset location: http(s) URL or local path to a CSV or zipped CSV
    #[arg(long)]
    pub source: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Number of event types shown per ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// What to do with rows whose counts or magnitudes are not numbers
    #[arg(long, default_value = "abort")]
    pub on_bad_row: BadRowPolicy,

    /// Label for rows without an event type
    #[arg(long, default_value = DEFAULT_MISSING_CATEGORY)]
    pub missing_category: String,

    #[arg(long, default_value_t = 300)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage after each phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn source(&self) -> &str {
        &self.source
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn bad_row_policy(&self) -> BadRowPolicy {
        self.on_bad_row
    }

    fn missing_category(&self) -> &str {
        &self.missing_category
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_source("source", &self.source)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("top_n", self.top_n, 1)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds as usize, 1)?;
        Ok(())
    }
}
