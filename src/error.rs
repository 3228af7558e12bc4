//! Error types for the booking crate

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::validation::FieldErrors;

/// Failures raised by an appointment store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The target record of an update or delete does not exist
    #[error("Appointment {0} not found")]
    NotFound(Uuid),

    /// Backend unavailable, constraint violated, or data unreadable
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn persistence<T: fmt::Display>(msg: T) -> Self {
        StoreError::Persistence(msg.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<salon_postgrest::PostgrestError> for StoreError {
    fn from(err: salon_postgrest::PostgrestError) -> Self {
        StoreError::persistence(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::persistence(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::persistence(err)
    }
}

/// Unified error type for the booking crate
#[derive(Error, Debug)]
pub enum Error {
    /// One or more booking fields broke a business rule
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Per-field errors when this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound(_)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_keep_their_kind() {
        let id = Uuid::new_v4();
        let err = Error::from(StoreError::NotFound(id));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Appointment {} not found", id));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = Error::from(StoreError::from(io));
        assert!(!err.is_not_found());
        assert!(matches!(err, Error::Store(StoreError::Persistence(_))));
    }

    #[test]
    fn config_errors_carry_no_field_errors() {
        let err = Error::config("SUPABASE_URL is required");
        assert_eq!(err.to_string(), "Configuration error: SUPABASE_URL is required");
        assert!(err.field_errors().is_none());
    }
}
