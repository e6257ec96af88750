use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotionError {
    #[error("Missing required configuration: {field}")]
    MissingCredentials { field: String },

    #[error("Notion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Notion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected Notion payload: {message}")]
    Payload { message: String },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Api,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NotionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NotionError::MissingCredentials { .. }
            | NotionError::ConfigValidation { .. }
            | NotionError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            NotionError::Transport(_) => ErrorCategory::Network,
            NotionError::Api { .. } => ErrorCategory::Api,
            NotionError::Payload { .. } | NotionError::Json(_) | NotionError::Csv(_) => {
                ErrorCategory::Data
            }
            NotionError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或 API 暫時性問題，可重試
            NotionError::Transport(_) => ErrorSeverity::Medium,
            NotionError::Api { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            NotionError::Api { .. }
            | NotionError::MissingCredentials { .. }
            | NotionError::ConfigValidation { .. }
            | NotionError::InvalidConfigValue { .. }
            | NotionError::Payload { .. }
            | NotionError::Json(_)
            | NotionError::Csv(_) => ErrorSeverity::High,
            NotionError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            NotionError::MissingCredentials { field } => {
                format!("Set {} in the environment, the config file, or via CLI flags", field)
            }
            NotionError::Transport(_) => {
                "Check network connectivity and the Notion API base URL, then retry".to_string()
            }
            NotionError::Api { status: 401, .. } => {
                "The integration token was rejected; create a new one in Notion settings".to_string()
            }
            NotionError::Api { status: 404, .. } => {
                "Verify the database id and that the database is shared with the integration"
                    .to_string()
            }
            NotionError::Api { status: 429, .. } => {
                "Rate limited by Notion; wait a moment before retrying".to_string()
            }
            NotionError::Api { .. } => "Inspect the response body logged above".to_string(),
            NotionError::Payload { .. } | NotionError::Json(_) => {
                "The Notion response did not have the expected shape; check the database schema"
                    .to_string()
            }
            NotionError::Csv(_) => "Check the exported project fields".to_string(),
            NotionError::Io(_) => "Check the output path and file permissions".to_string(),
            NotionError::ConfigValidation { field, .. }
            | NotionError::InvalidConfigValue { field, .. } => {
                format!("Fix the value of '{}' in your configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach Notion: {}", self),
            ErrorCategory::Api => format!("Notion rejected the request: {}", self),
            ErrorCategory::Data => format!("Could not read project data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotionError>;
