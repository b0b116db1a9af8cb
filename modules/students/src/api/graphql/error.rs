use async_graphql::{Error, ErrorExtensions};

use crate::domain::error::DomainError;

/// `extensions.code` for a malformed student id.
pub const INVALID_ID: &str = "INVALID_ID";
/// `extensions.code` for store and connectivity failures.
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";

impl ErrorExtensions for DomainError {
    fn extend(&self) -> Error {
        let code = match self {
            DomainError::InvalidId { .. } => INVALID_ID,
            DomainError::Database { message } => {
                tracing::error!(error = %message, "student store call failed");
                STORE_UNAVAILABLE
            }
        };
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}
