use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Failed to fetch page content from URL ({url}): {message}")]
    FetchError {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Unable to parse page content as HTML ({url}): {message}")]
    ParseError { url: String, message: String },

    #[error("Expected page structure was missing: {anchor} ({url})")]
    PageStructureError { anchor: String, url: String },

    #[error("Unable to find value for the given path. ({path})")]
    ValueNotFound { path: String },

    #[error("Invalid document path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Unable to parse {field}: {reason}. ({raw})")]
    FieldParseError {
        field: String,
        raw: String,
        reason: String,
    },

    #[error("Team '{team_name}' matched {matches} of the scheduled pair. ({pair})")]
    TeamReconciliationError {
        team_name: String,
        pair: String,
        matches: usize,
    },

    #[error("Unknown venue provided: {reason}. ({venue})")]
    UnknownVenueError { venue: String, reason: String },

    #[error("Unknown {field} referenced: {value}")]
    UnknownFieldError { field: String, value: String },

    #[error("Configuration validation failed for field '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Mail delivery to {recipient} failed: {message}")]
    DeliveryError { recipient: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Document,
    Configuration,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertError {
    pub fn field_parse(field: &str, raw: &str, reason: impl Into<String>) -> Self {
        AlertError::FieldParseError {
            field: field.to_string(),
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AlertError::FetchError { .. } => ErrorCategory::Network,
            AlertError::ParseError { .. }
            | AlertError::PageStructureError { .. }
            | AlertError::ValueNotFound { .. }
            | AlertError::InvalidPath { .. }
            | AlertError::FieldParseError { .. }
            | AlertError::TeamReconciliationError { .. } => ErrorCategory::Document,
            AlertError::UnknownVenueError { .. }
            | AlertError::UnknownFieldError { .. }
            | AlertError::ConfigValidationError { .. }
            | AlertError::InvalidConfigValueError { .. }
            | AlertError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AlertError::DeliveryError { .. } => ErrorCategory::Delivery,
            AlertError::IoError(_) | AlertError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Document | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AlertError::FetchError { .. } => {
                "Check network connectivity and that the venue site is up, then run again"
            }
            AlertError::ParseError { .. }
            | AlertError::PageStructureError { .. }
            | AlertError::ValueNotFound { .. } => {
                "The venue page layout may have changed; compare the page against the adapter paths"
            }
            AlertError::InvalidPath { .. } => "Fix the document path expression in the venue adapter",
            AlertError::FieldParseError { .. } => {
                "A schedule cell has an unexpected format; check the raw value in the message"
            }
            AlertError::TeamReconciliationError { .. } => {
                "Make sure the configured team name matches the name printed on the schedule exactly"
            }
            AlertError::UnknownVenueError { .. } => {
                "Use one of ForestViewLanes or ToledoSportAndSocialClub as the league venue"
            }
            AlertError::UnknownFieldError { .. }
            | AlertError::ConfigValidationError { .. }
            | AlertError::InvalidConfigValueError { .. }
            | AlertError::MissingConfigError { .. } => "Review the team configuration file",
            AlertError::DeliveryError { .. } => "Check the mail endpoint and recipient address",
            AlertError::IoError(_) => "Check file paths and permissions",
            AlertError::SerializationError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the venue schedule: {}", self),
            ErrorCategory::Document => format!("Could not read the venue schedule: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Delivery => format!("Could not deliver a message: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
