// SPDX-License-Identifier: MIT

//! Application error types with consistent user-facing messages.

/// Application error type.
///
/// `InvalidFormat` and `InvalidValue` carry a user-correctable message that
/// is shown verbatim in chat. Backend failures (`Database`, `Discord`) are
/// logged with detail server-side and surfaced as a generic apology.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Discord error: {0}")]
    Discord(String),
}

impl AppError {
    /// The one message a user sees for this error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidFormat(msg)
            | AppError::InvalidValue(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => format!("❌ {msg}"),
            AppError::Database(_) | AppError::Discord(_) => {
                "❌ Something went wrong on our end. Please try again.".to_string()
            }
        }
    }
}

impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::Discord(err.to_string())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_surface_validation_detail() {
        let err = AppError::InvalidFormat("Invalid date format. Use MM/DD.".to_string());
        assert_eq!(err.user_message(), "❌ Invalid date format. Use MM/DD.");
    }

    #[test]
    fn backend_errors_hide_detail() {
        let err = AppError::Database("connection reset".to_string());
        assert!(!err.user_message().contains("connection reset"));
    }
}
