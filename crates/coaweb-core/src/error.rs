//! Error types for coaweb-core
//!
//! Every failure of the accounts view collapses into a single display string
//! for the user, but the variants keep enough structure for logging and the
//! JSON API.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Shown when a fetch fails without a usable message
pub const DEFAULT_FETCH_ERROR: &str = "Failed to load accounts";

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No company selected
    NoCompany,
    /// Account fetch failed
    FetchFailed,
    /// Service answered with something we could not read
    InvalidResponse,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NoCompany => write!(f, "NO_COMPANY"),
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for coaweb-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("No company selected")]
    NoCompany,

    #[error("{message}")]
    FetchFailed { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoreError {
    /// Fetch failure carrying the service's message
    pub fn fetch(message: impl Into<String>) -> Self {
        CoreError::FetchFailed { message: message.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NoCompany => ErrorCode::NoCompany,
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NoCompany => ErrorSeverity::Info,
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
            CoreError::InvalidResponse { .. } => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// The string stored in the view's `error` field
    pub fn user_message(&self) -> String {
        let message = match self {
            CoreError::FetchFailed { message } => message.trim().to_string(),
            other => other.to_string(),
        };
        if message.is_empty() {
            DEFAULT_FETCH_ERROR.to_string()
        } else {
            message
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.user_message());

        match self {
            CoreError::NoCompany => {
                details = details.with_suggestion(
                    "Select a company with /accounts?company=<id>.".to_string()
                );
            }
            CoreError::FetchFailed { .. } => {
                details = details.with_suggestion(
                    "Check that the banking service is reachable.".to_string()
                );
                details = details.with_suggestion(
                    "Use the Retry button or POST /accounts/refresh to try again.".to_string()
                );
            }
            CoreError::InvalidResponse { message } => {
                details = details.with_detail(serde_json::json!({ "decode_message": message }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Sequence number of the fetch
    pub request_id: Option<u64>,
    /// Company being loaded
    pub company_id: Option<String>,
    /// Operation being performed
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            request_id: None,
            company_id: None,
            operation: operation.to_string(),
        }
    }

    pub fn with_request_id(mut self, request_id: u64) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_company(mut self, company_id: &str) -> Self {
        self.company_id = Some(company_id.to_string());
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_debug(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let message = format!(
            "[{}] {} - Operation: {} - Company: {:?} - Request: {:?}",
            error.code(),
            error.user_message(),
            context.operation,
            context.company_id,
            context.request_id
        );
        match error.severity() {
            ErrorSeverity::Info => log::info!(target: "coaweb::error", "{}", message),
            ErrorSeverity::Warning | ErrorSeverity::Error => {
                log::warn!(target: "coaweb::error", "{}", message)
            }
            ErrorSeverity::Critical => log::error!(target: "coaweb::error", "{}", message),
        }
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "coaweb::error",
            "{} - Operation: {} - Company: {:?} - Request: {:?}",
            message,
            context.operation,
            context.company_id,
            context.request_id
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NoCompany.to_string(), "NO_COMPANY");
        assert_eq!(ErrorCode::FetchFailed.to_string(), "FETCH_FAILED");
    }

    #[test]
    fn test_user_message_passes_through() {
        let error = CoreError::fetch("timeout");
        assert_eq!(error.user_message(), "timeout");
        assert_eq!(error.to_string(), "timeout");
    }

    #[test]
    fn test_user_message_defaults_when_empty() {
        assert_eq!(CoreError::fetch("").user_message(), DEFAULT_FETCH_ERROR);
        assert_eq!(CoreError::fetch("   ").user_message(), DEFAULT_FETCH_ERROR);
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::NoCompany.severity(), ErrorSeverity::Info);
        assert_eq!(CoreError::fetch("x").severity(), ErrorSeverity::Error);
        let error = CoreError::ConfigError { message: "bad".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_details_fetch_failed() {
        let details = CoreError::fetch("HTTP 503").to_details();
        assert_eq!(details.code, ErrorCode::FetchFailed);
        assert_eq!(details.message, "HTTP 503");
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("load_accounts")
            .with_request_id(7)
            .with_company("acme");
        assert_eq!(context.operation, "load_accounts");
        assert_eq!(context.request_id, Some(7));
        assert_eq!(context.company_id.as_deref(), Some("acme"));
    }
}
