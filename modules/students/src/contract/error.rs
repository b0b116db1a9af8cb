use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudentsError {
    #[error("Invalid student id: '{id}'")]
    InvalidId { id: String },

    #[error("Student store unavailable")]
    StoreUnavailable,
}

impl StudentsError {
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    pub fn store_unavailable() -> Self {
        Self::StoreUnavailable
    }
}

impl From<crate::domain::error::DomainError> for StudentsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            InvalidId { value } => Self::invalid_id(value),
            Database { .. } => Self::store_unavailable(),
        }
    }
}
