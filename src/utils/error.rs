use crate::domain::model::{Band, RangeViolation};
use thiserror::Error;

pub const TRANSPORT_FAILURE_MESSAGE: &str = "Prediction failed. Check backend is running.";

#[derive(Error, Debug)]
pub enum StellarError {
    #[error("Missing or non-numeric magnitude for band(s): {}", join_bands(.bands))]
    MissingValue { bands: Vec<Band> },

    #[error("Magnitude out of range: {}", join_violations(.violations))]
    OutOfRange { violations: Vec<RangeViolation> },

    #[error("Invalid extinction preset: '{level}' (expected low, medium or high)")]
    InvalidPreset { level: String },

    #[error("Invalid custom E(B-V) value: '{value}'")]
    InvalidCustomValue { value: String },

    #[error("Invalid distance: {distance} pc (must be a positive number)")]
    InvalidDistance { distance: f64 },

    #[error("Prediction service request failed: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Report archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

impl From<reqwest::Error> for StellarError {
    fn from(err: reqwest::Error) -> Self {
        StellarError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Transport,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StellarError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StellarError::MissingValue { .. }
            | StellarError::OutOfRange { .. }
            | StellarError::InvalidPreset { .. }
            | StellarError::InvalidCustomValue { .. }
            | StellarError::InvalidDistance { .. } => ErrorCategory::Validation,
            StellarError::Transport { .. } => ErrorCategory::Transport,
            StellarError::ConfigError { .. } | StellarError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            StellarError::IoError(_)
            | StellarError::SerializationError(_)
            | StellarError::ArchiveError(_)
            | StellarError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Text shown to the user. Transport failures collapse into one generic message.
    pub fn user_friendly_message(&self) -> String {
        match self {
            StellarError::MissingValue { bands } => format!(
                "All UGRIZ values must be entered. Missing: {}.",
                join_bands(bands)
            ),
            StellarError::OutOfRange { violations } => format!(
                "All values must be between {} and {}. {}.",
                crate::core::photometry::MAG_MIN,
                crate::core::photometry::MAG_MAX,
                join_violations(violations)
            ),
            StellarError::InvalidPreset { level } => {
                format!("Unknown extinction preset '{}'.", level)
            }
            StellarError::InvalidCustomValue { value } => {
                format!("Custom E(B-V) must be a number, got '{}'.", value)
            }
            StellarError::InvalidDistance { distance } => {
                format!("Distance must be positive, got {} pc.", distance)
            }
            StellarError::Transport { .. } => TRANSPORT_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Correct the highlighted input and submit again"
            }
            ErrorCategory::Transport => {
                "Check that the prediction service is reachable, then resubmit"
            }
            ErrorCategory::Configuration => "Review the configuration file and CLI flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

fn join_bands(bands: &[Band]) -> String {
    bands
        .iter()
        .map(|b| b.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_violations(violations: &[RangeViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, StellarError>;
