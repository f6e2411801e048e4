use crate::domain::model::AnimalId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HerdError {
    #[error("Invalid animal name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid sex '{value}': expected 'M' or 'F'")]
    InvalidSex { value: String },

    #[error("Invalid identifier for {field}: {value}")]
    InvalidIdentifier { field: String, value: i64 },

    #[error("Identifier for {field} out of range: {value}")]
    IdentifierOutOfRange { field: String, value: u64 },

    #[error("Duplicate animal id {id}")]
    DuplicateId { id: AnimalId },

    #[error("Animal {id} not found, cannot resolve its ancestry")]
    RootNotFound { id: AnimalId },

    #[error("Animal {id} not found")]
    AnimalNotFound { id: AnimalId },

    #[error("Invalid page size: {requested}")]
    InvalidPageSize { requested: i64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

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
    Validation,
    Lookup,
    Pagination,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HerdError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HerdError::InvalidName { .. }
            | HerdError::InvalidSex { .. }
            | HerdError::InvalidIdentifier { .. }
            | HerdError::IdentifierOutOfRange { .. }
            | HerdError::DuplicateId { .. } => ErrorCategory::Validation,
            HerdError::RootNotFound { .. } | HerdError::AnimalNotFound { .. } => {
                ErrorCategory::Lookup
            }
            HerdError::InvalidPageSize { .. } => ErrorCategory::Pagination,
            HerdError::IoError(_)
            | HerdError::CsvError(_)
            | HerdError::SerializationError(_)
            | HerdError::StorageError { .. } => ErrorCategory::Storage,
            HerdError::ConfigError { .. }
            | HerdError::ConfigValidationError { .. }
            | HerdError::InvalidConfigValueError { .. }
            | HerdError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup | ErrorCategory::Pagination => ErrorSeverity::Low,
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            HerdError::InvalidName { .. } => {
                "Use a name between 3 and 50 characters long".to_string()
            }
            HerdError::InvalidSex { .. } => "Use 'M' for male or 'F' for female".to_string(),
            HerdError::InvalidIdentifier { field, .. } => {
                format!("Use a non-negative number for {}", field)
            }
            HerdError::IdentifierOutOfRange { field, .. } => {
                format!("Use a number no larger than {} for {}", i64::MAX, field)
            }
            HerdError::DuplicateId { .. } => {
                "Give every animal in the herd file its own id".to_string()
            }
            HerdError::RootNotFound { .. } | HerdError::AnimalNotFound { .. } => {
                "Check the animal id with the `list` command".to_string()
            }
            HerdError::InvalidPageSize { .. } => "Request a page size of at least 1".to_string(),
            HerdError::IoError(_) => "Check that the herd file exists and is readable".to_string(),
            HerdError::CsvError(_) => {
                "Check the CSV header: id,name,sex,father_id,mother_id".to_string()
            }
            HerdError::SerializationError(_) => {
                "Check that the herd file contains a JSON array of animals".to_string()
            }
            HerdError::StorageError { .. } => "Retry once the store is reachable".to_string(),
            HerdError::ConfigError { .. }
            | HerdError::ConfigValidationError { .. }
            | HerdError::InvalidConfigValueError { .. }
            | HerdError::MissingConfigError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("The animal record is invalid: {}", self),
            ErrorCategory::Lookup => self.to_string(),
            ErrorCategory::Pagination => format!("Bad page request: {}", self),
            ErrorCategory::Storage => format!("Could not access the herd data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, HerdError>;
