//! Error types and handling for the `ScooterHub` service

use thiserror::Error;

use crate::index::IndexError;

/// Main error type for the `ScooterHub` service
#[derive(Error, Debug)]
pub enum ScooterHubError {
    /// Location or scooter lookups that found nothing
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Insert of an identifier that is already present
    #[error("Duplicate location id: {id}")]
    DuplicateKey { id: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed or unreadable dataset
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// No free identifier found for a new location
    #[error("Identifier allocation failed after {attempts} attempts")]
    IdExhausted { attempts: usize },

    /// Writing the dataset back to storage failed
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding or decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl ScooterHubError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new duplicate-key error
    pub fn duplicate_key<S: Into<String>>(id: S) -> Self {
        Self::DuplicateKey { id: id.into() }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ScooterHubError::NotFound { message } => message.clone(),
            ScooterHubError::DuplicateKey { id } => {
                format!("Location {id} already exists")
            }
            ScooterHubError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ScooterHubError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ScooterHubError::Dataset { .. } | ScooterHubError::Json { .. } => {
                "Location dataset could not be read.".to_string()
            }
            ScooterHubError::IdExhausted { .. } => {
                "Could not assign an identifier to the new location. Please retry.".to_string()
            }
            ScooterHubError::Persistence { .. } => {
                "Change could not be saved. Nothing was modified.".to_string()
            }
            ScooterHubError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<IndexError> for ScooterHubError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::DuplicateKey(id) => Self::DuplicateKey { id },
            IndexError::NotFound(id) => Self::NotFound {
                message: format!("Location {id} doesn't exist"),
            },
        }
    }
}
