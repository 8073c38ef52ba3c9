use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} with {field} '{value}' already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Invalid slug '{value}': {reason}")]
    InvalidSlug { value: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream responded with status {status} for {url}")]
    Upstream { status: u16, url: String },

    #[error("Request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
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
    Content,
    Network,
    Data,
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

impl CmsError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        CmsError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn conflict(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        CmsError::Conflict {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound { .. })
    }

    /// 網路層失敗（包含逾時與上游錯誤）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CmsError::Transport(_) | CmsError::Upstream { .. } | CmsError::Timeout { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CmsError::NotFound { .. } | CmsError::Conflict { .. } | CmsError::InvalidSlug { .. } => {
                ErrorCategory::Content
            }
            CmsError::Transport(_) | CmsError::Upstream { .. } | CmsError::Timeout { .. } => {
                ErrorCategory::Network
            }
            CmsError::Csv(_) | CmsError::Serialization(_) => ErrorCategory::Data,
            CmsError::ConfigValidationError { .. }
            | CmsError::InvalidConfigValueError { .. }
            | CmsError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CmsError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Content => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CmsError::NotFound { .. } => "Check the slug or id, and that the entry is published",
            CmsError::Conflict { .. } => "Choose a different slug or update the existing entry",
            CmsError::InvalidSlug { .. } => {
                "Use lowercase letters, digits, '-' or '_', with '/' between path parts"
            }
            CmsError::Transport(_) | CmsError::Timeout { .. } => {
                "Check that the CMS API is reachable and raise api.timeout_seconds if needed"
            }
            CmsError::Upstream { .. } => "Inspect the CMS API logs for the failing request",
            CmsError::Csv(_) | CmsError::Serialization(_) => {
                "The data returned by the CMS API has an unexpected shape"
            }
            CmsError::Io(_) => "Check file permissions and the export output path",
            CmsError::ConfigValidationError { .. }
            | CmsError::InvalidConfigValueError { .. }
            | CmsError::MissingConfigError { .. } => "Fix the configuration file and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CmsError::NotFound { entity, key } => format!("{} '{}' could not be found", entity, key),
            CmsError::Conflict { entity, field, value } => {
                format!("A {} with {} '{}' already exists", entity, field, value)
            }
            CmsError::Transport(_) | CmsError::Upstream { .. } | CmsError::Timeout { .. } => {
                format!("Could not reach the CMS: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let missing = CmsError::not_found("Page", "about");
        assert!(missing.is_not_found());
        assert_eq!(missing.category(), ErrorCategory::Content);
        assert_eq!(missing.severity(), ErrorSeverity::Low);
        assert_eq!(missing.user_friendly_message(), "Page 'about' could not be found");

        let timeout = CmsError::Timeout { after_ms: 500 };
        assert!(timeout.is_transport());
        assert_eq!(timeout.severity(), ErrorSeverity::Medium);

        let bad_slug = CmsError::InvalidSlug {
            value: "Bad Slug".to_string(),
            reason: "contains a space".to_string(),
        };
        assert_eq!(bad_slug.category(), ErrorCategory::Content);
        assert_eq!(bad_slug.severity(), ErrorSeverity::Low);

        let conflict = CmsError::conflict("Category", "slug", "news");
        assert_eq!(conflict.to_string(), "Category with slug 'news' already exists");
    }
}
