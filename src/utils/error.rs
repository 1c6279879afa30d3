use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpsetError {
    #[error("Invalid set count '{input}': expected a positive integer")]
    InvalidSetCount { input: String },

    #[error("Set {index} has a blank name")]
    BlankSetName { index: usize },

    #[error("Set '{name}' cannot be empty")]
    EmptySet { name: String },

    #[error("Set name '{name}' is used more than once")]
    DuplicateSetName { name: String },

    #[error("No sets were provided")]
    NoSets,

    #[error("No data to {action}")]
    NoData { action: String },

    #[error("Malformed matrix at line {line}: {reason}")]
    MalformedMatrix { line: usize, reason: String },

    #[error("Plot drawing failed: {message}")]
    PlotError { message: String },

    #[error("Plot would be {width}x{height} pixels, above the {limit} pixel limit")]
    PlotTooLarge { width: u64, height: u64, limit: u64 },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Config,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UpsetError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UpsetError::InvalidSetCount { .. }
            | UpsetError::BlankSetName { .. }
            | UpsetError::EmptySet { .. }
            | UpsetError::DuplicateSetName { .. }
            | UpsetError::NoSets => ErrorCategory::Input,
            UpsetError::ConfigError { .. }
            | UpsetError::InvalidConfigValueError { .. }
            | UpsetError::MissingConfigError { .. } => ErrorCategory::Config,
            UpsetError::IoError(_) | UpsetError::ZipError(_) => ErrorCategory::Io,
            UpsetError::NoData { .. }
            | UpsetError::MalformedMatrix { .. }
            | UpsetError::CsvError(_)
            | UpsetError::ImageError(_)
            | UpsetError::PlotError { .. }
            | UpsetError::PlotTooLarge { .. }
            | UpsetError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            UpsetError::NoData { .. }
            | UpsetError::MalformedMatrix { .. }
            | UpsetError::PlotTooLarge { .. } => ErrorSeverity::Medium,
            _ if self.category() == ErrorCategory::Io => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            UpsetError::InvalidSetCount { .. } => "Enter a whole number greater than zero",
            UpsetError::BlankSetName { .. } => "Give every set a non-blank name",
            UpsetError::EmptySet { .. } => "Enter at least one item per set, one per line",
            UpsetError::DuplicateSetName { .. } => "Use a distinct name for each set",
            UpsetError::NoSets => "Pass --set NAME=ITEMS, use --interactive, or add [[sets]] to the config",
            UpsetError::NoData { .. } => "Process at least one non-empty set before exporting",
            UpsetError::MalformedMatrix { .. } => {
                "Check that the file was written by upset-matrix and uses the same delimiter"
            }
            UpsetError::ConfigError { .. }
            | UpsetError::InvalidConfigValueError { .. }
            | UpsetError::MissingConfigError { .. } => "Fix the configuration value and run again",
            UpsetError::IoError(_) | UpsetError::ZipError(_) => {
                "Check that the output directory exists and is writable"
            }
            UpsetError::CsvError(_) | UpsetError::SerializationError(_) => {
                "Check the input data for unsupported characters"
            }
            UpsetError::ImageError(_) | UpsetError::PlotError { .. } => "Try a smaller --scale value",
            UpsetError::PlotTooLarge { .. } => {
                "Lower --scale, shorten set names, or leave png out of --formats"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input error: {}", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Could not write output: {}", self),
            ErrorCategory::Data => format!("Could not produce output: {}", self),
        }
    }

    /// 依嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, UpsetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_high_severity() {
        let err = UpsetError::EmptySet {
            name: "A".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Set 'A' cannot be empty");
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = UpsetError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Could not write output"));
    }

    #[test]
    fn test_oversized_plot_is_a_data_error() {
        let err = UpsetError::PlotTooLarge {
            width: 100_000,
            height: 1_000,
            limit: 50_000_000,
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.exit_code(), 2);
    }
}
