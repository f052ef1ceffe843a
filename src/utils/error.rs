use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Failed to load {source_id}: HTTP {status}")]
    StatusError { source_id: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed payload from {source_id}: {message}")]
    MalformedPayload { source_id: String, message: String },

    #[error("Retrieval of {source_id} timed out after {limit:?}")]
    TimeoutError { source_id: String, limit: Duration },

    #[error("Template failed on item {index}: {message}")]
    TemplateError { index: usize, message: String },

    #[error("Document error on mount '{mount}': {message}")]
    DocumentError { mount: String, message: String },

    #[error("Render task for '{mount}' aborted: {message}")]
    TaskError { mount: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RenderError {
    /// Errors raised while obtaining a section's data, as opposed to rendering it.
    pub fn is_retrieval_failure(&self) -> bool {
        matches!(
            self,
            RenderError::TransportError(_)
                | RenderError::StatusError { .. }
                | RenderError::IoError(_)
                | RenderError::SerializationError(_)
                | RenderError::MalformedPayload { .. }
                | RenderError::TimeoutError { .. }
        )
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RenderError::TransportError(_)
            | RenderError::StatusError { .. }
            | RenderError::TimeoutError { .. } => ErrorSeverity::Medium,
            RenderError::SerializationError(_)
            | RenderError::MalformedPayload { .. }
            | RenderError::TemplateError { .. }
            | RenderError::DocumentError { .. } => ErrorSeverity::High,
            RenderError::ConfigError { .. }
            | RenderError::MissingConfigError { .. }
            | RenderError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            RenderError::IoError(_) | RenderError::TaskError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RenderError::TransportError(_) | RenderError::TimeoutError { .. } => {
                "Check network connectivity and that the data host is reachable"
            }
            RenderError::StatusError { .. } => "Check that the data file exists at the configured source",
            RenderError::SerializationError(_) | RenderError::MalformedPayload { .. } => {
                "Data files must contain a JSON array of objects"
            }
            RenderError::TemplateError { .. } => {
                "Check that every item carries the fields its template requires"
            }
            RenderError::DocumentError { .. } => "Check the page markup around the mount element",
            RenderError::IoError(_) => "Check file paths and permissions",
            RenderError::TaskError { .. } => "Re-run with --verbose and inspect the log",
            RenderError::ConfigError { .. }
            | RenderError::MissingConfigError { .. }
            | RenderError::InvalidConfigValueError { .. } => "Fix the configuration file and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
