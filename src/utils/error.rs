use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Simulation failed: {message}")]
    SimulationError { message: String },

    #[error("Chart rendering failed: {message}")]
    ChartError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Simulation,
    Reporting,
    Storage,
}

impl PricingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PricingError::SimulationError { .. } => ErrorCategory::Simulation,
            PricingError::ChartError { .. }
            | PricingError::CsvError(_)
            | PricingError::SerializationError(_) => ErrorCategory::Reporting,
            PricingError::IoError(_) | PricingError::ZipError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Missing charts don't invalidate the numeric results
            PricingError::ChartError { .. } => ErrorSeverity::Low,
            PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => ErrorSeverity::Medium,
            PricingError::IoError(_)
            | PricingError::ZipError(_)
            | PricingError::CsvError(_)
            | PricingError::SerializationError(_) => ErrorSeverity::High,
            PricingError::SimulationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PricingError::ZipError(_) => {
                "Check that the output directory is writable and has free space".to_string()
            }
            PricingError::CsvError(_) | PricingError::SerializationError(_) => {
                "Re-run the pricing job; if the problem persists report the pricing inputs"
                    .to_string()
            }
            PricingError::IoError(_) => {
                "Verify the output path exists and the process has write permission".to_string()
            }
            PricingError::ConfigValidationError { field, .. }
            | PricingError::InvalidConfigValueError { field, .. }
            | PricingError::MissingConfigError { field } => {
                format!("Fix the '{}' setting and run again", field)
            }
            PricingError::SimulationError { .. } => {
                "Reduce the path count or batch count and retry".to_string()
            }
            PricingError::ChartError { .. } => {
                "Charts need a usable system font; install one or run with --no-charts"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PricingError::ConfigValidationError { field, message } => {
                format!("Configuration problem ({}): {}", field, message)
            }
            PricingError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for {}: {}", value, field, reason)
            }
            PricingError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
