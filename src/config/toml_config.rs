use crate::core::ConfigProvider;
use crate::domain::model::BadRowPolicy;
use crate::domain::ports::{
    ColumnNames, DEFAULT_ARCHIVE_NAME, DEFAULT_MISSING_CATEGORY, DEFAULT_TOP_N, OUTPUT_FORMATS,
};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub rank: RankConfig,
    pub load: LoadConfig,
    #[serde(default)]
    pub error_handling: ErrorHandlingConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub location: String,
    pub timeout_seconds: Option<u64>,
    pub columns: Option<ColumnNames>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    pub missing_category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankConfig {
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Option<Vec<String>>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_bad_row: Option<BadRowPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_source("source.location", &self.source.location)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_positive_number("rank.top_n", self.top_n(), 1)?;
        validation::validate_positive_number(
            "source.timeout_seconds",
            self.request_timeout_seconds() as usize,
            1,
        )?;
        validation::validate_one_of(
            "load.output_formats",
            &self.output_formats(),
            &OUTPUT_FORMATS,
        )?;

        if let Some(name) = self.archive_name() {
            validation::validate_path("load.compression.filename", &name)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> &str {
        &self.source.location
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn top_n(&self) -> usize {
        self.rank.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    fn bad_row_policy(&self) -> BadRowPolicy {
        self.error_handling.on_bad_row.unwrap_or_default()
    }

    fn missing_category(&self) -> &str {
        self.transform
            .missing_category
            .as_deref()
            .unwrap_or(DEFAULT_MISSING_CATEGORY)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn columns(&self) -> ColumnNames {
        self.source.columns.clone().unwrap_or_default()
    }

    fn output_formats(&self) -> Vec<String> {
        self.load
            .output_formats
            .clone()
            .unwrap_or_else(|| OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect())
    }

    fn archive_name(&self) -> Option<String> {
        match &self.load.compression {
            Some(c) if !c.enabled => None,
            Some(c) => Some(
                c.filename
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
            ),
            None => Some(DEFAULT_ARCHIVE_NAME.to_string()),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
