//! Error types for CQLBridge
//!
//! Every codec, translator and describe operation fails with [`Error`].
//! Gateway handlers never hand an [`Error`] to a client directly; they map it
//! to a [`Status`] with [`Error::to_status`], which is where the origin of
//! the offending bytes (client request vs. backing store) decides the
//! status class.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for CQLBridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CQLBridge operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The wire value's variant does not match the target column type
    #[error("Expected {expected} value, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: String,
    },

    /// A numeric value does not fit the target column type
    #[error("Valid range for {type_name} is {min} to {max}")]
    OutOfRange {
        type_name: String,
        min: String,
        max: String,
    },

    /// A serialized value has the wrong length for its type
    #[error("Malformed {type_name} value: expected {expected} bytes, got {actual}")]
    MalformedValue {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    /// A serialized value has a plausible length but unreadable content
    #[error("Corrupt {type_name} value: {reason}")]
    CorruptValue { type_name: String, reason: String },

    /// The column type has no codec
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Keyspace absent from the catalog
    #[error("Keyspace not found: {0}")]
    KeyspaceNotFound(String),

    /// Table absent from an existing keyspace
    #[error("Table not found: {keyspace}.{table}")]
    TableNotFound { keyspace: String, table: String },

    /// The catalog's replication options cannot be rendered
    #[error("Invalid replication for keyspace {keyspace}: {reason}")]
    InvalidReplication { keyspace: String, reason: String },

    /// Fetching the catalog snapshot failed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an out-of-range error naming the type's valid bounds
    pub fn out_of_range(
        type_name: impl Into<String>,
        min: impl fmt::Display,
        max: impl fmt::Display,
    ) -> Self {
        Self::OutOfRange {
            type_name: type_name.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Create a malformed value error
    pub fn malformed(type_name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::MalformedValue {
            type_name: type_name.into(),
            expected,
            actual,
        }
    }

    /// Create a corrupt value error
    pub fn corrupt(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptValue {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(name: impl Into<String>) -> Self {
        Self::UnsupportedType(name.into())
    }

    /// Create a keyspace not found error
    pub fn keyspace_not_found(name: impl Into<String>) -> Self {
        Self::KeyspaceNotFound(name.into())
    }

    /// Create a table not found error
    pub fn table_not_found(keyspace: impl Into<String>, table: impl Into<String>) -> Self {
        Self::TableNotFound {
            keyspace: keyspace.into(),
            table: table.into(),
        }
    }

    /// Create an invalid replication error
    pub fn invalid_replication(keyspace: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReplication {
            keyspace: keyspace.into(),
            reason: reason.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::TypeMismatch { .. } | Error::OutOfRange { .. } => ErrorCategory::Value,
            Error::MalformedValue { .. } | Error::CorruptValue { .. } => ErrorCategory::Encoding,
            Error::UnsupportedType(_) => ErrorCategory::Type,
            Error::KeyspaceNotFound(_) | Error::TableNotFound { .. } => ErrorCategory::NotFound,
            Error::InvalidReplication { .. } | Error::Catalog(_) => ErrorCategory::Catalog,
            Error::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Map this error to the client-facing status for a value that came from `source`
    pub fn to_status(&self, source: ValueSource) -> Status {
        let code = match self.category() {
            ErrorCategory::NotFound => StatusCode::NotFound,
            ErrorCategory::Type | ErrorCategory::Value => StatusCode::InvalidArgument,
            ErrorCategory::Encoding => match source {
                ValueSource::Client => StatusCode::InvalidArgument,
                ValueSource::Store => StatusCode::Internal,
            },
            ErrorCategory::Catalog | ErrorCategory::Configuration => StatusCode::Internal,
        };

        let message = match self {
            Error::KeyspaceNotFound(_) => "Keyspace not found".to_string(),
            Error::TableNotFound { .. } => "Table not found".to_string(),
            other => other.to_string(),
        };

        Status { code, message }
    }
}

/// Error categories for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Value does not fit its target type
    Value,
    /// Serialized bytes cannot be read
    Encoding,
    /// Column type has no codec
    Type,
    /// Keyspace or table absent
    NotFound,
    /// Catalog content or access problems
    Catalog,
    /// Configuration errors
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Value => "Value",
            ErrorCategory::Encoding => "Encoding",
            ErrorCategory::Type => "Type",
            ErrorCategory::NotFound => "NotFound",
            ErrorCategory::Catalog => "Catalog",
            ErrorCategory::Configuration => "Configuration",
        };
        write!(f, "{}", name)
    }
}

/// Where the bytes or value being converted came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Supplied by a client request
    Client,
    /// Read back from the backing store
    Store,
}

/// Status classes surfaced to gateway clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusCode {
    NotFound,
    InvalidArgument,
    Internal,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::Internal => "INTERNAL",
        };
        write!(f, "{}", name)
    }
}

/// A client-facing failure: status class plus description
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{code}: {message}")]
pub struct Status {
    pub code: StatusCode,
    pub message: String,
}

impl Status {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::NotFound,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::InvalidArgument,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Internal,
            message: message.into(),
        }
    }
}
