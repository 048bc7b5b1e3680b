use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Download failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    FormatError(#[from] std::fmt::Error),

    #[error("Malformed data at line {line}, field '{field}': {message}")]
    DataFormat {
        line: u64,
        field: String,
        message: String,
    },

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Storage,
    Configuration,
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn data_format(line: u64, field: &str, message: impl Into<String>) -> Self {
        Self::DataFormat {
            line,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::DataFormat { .. } => ErrorCategory::Input,
            EtlError::IoError(_) | EtlError::SerializationError(_) | EtlError::FormatError(_) => {
                ErrorCategory::Storage
            }
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::InvalidArgument { .. } => ErrorCategory::Usage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Usage | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check the source URL and network connectivity, then retry",
            EtlError::ZipError(_) => "Make sure the source archive is a valid zip file",
            EtlError::CsvError(_) => "Make sure the source is a comma-separated file with a header row",
            EtlError::DataFormat { .. } => {
                "Fix the offending row or rerun with --on-bad-row skip to exclude corrupt rows"
            }
            EtlError::IoError(_) => "Check that the paths exist and are writable",
            EtlError::SerializationError(_) | EtlError::FormatError(_) => {
                "Report this as a bug; the report could not be encoded"
            }
            EtlError::InvalidArgument { .. } => "Pass a positive value for the ranking size",
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration values and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) => format!("Could not download the storm dataset: {}", e),
            EtlError::DataFormat { line, field, .. } => {
                format!("The dataset has a malformed '{}' value on line {}", field, line)
            }
            EtlError::ConfigValidationError { field, message } => {
                format!("The setting '{}' is invalid: {}", field, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
