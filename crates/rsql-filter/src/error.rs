//! Error types for RSQL parsing and translation.

use thiserror::Error;

/// A specialized Result type for RSQL operations.
pub type RsqlResult<T> = Result<T, RsqlError>;

/// Errors that can occur while turning a query string into a filter document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RsqlError {
    /// No translator is registered under the requested backend identifier.
    #[error("unsupported backend: {backend}")]
    UnsupportedBackend {
        /// The backend identifier that was requested.
        backend: String,
    },

    /// A triple used an operator outside the recognized set.
    #[error("invalid operator: {operator}{}", suggestion_hint(.suggestion))]
    InvalidOperator {
        /// The rejected operator text.
        operator: String,
        /// The closest recognized operator, if one is near enough.
        suggestion: Option<String>,
    },

    /// An `in`/`out` value was not wrapped in parentheses.
    #[error("malformed list value for field '{field}': {value} (expected \"(a,b,...)\")")]
    MalformedListValue {
        /// The field the list was meant for.
        field: String,
        /// The raw value as written in the query.
        value: String,
    },

    /// A `;`-separated segment did not have a `field==value` or
    /// `field==op==value` shape.
    #[error("malformed segment at position {position}: '{segment}'")]
    MalformedSegment {
        /// The raw segment text.
        segment: String,
        /// Zero-based index of the segment in the query.
        position: usize,
    },

    /// Parse options could not be loaded.
    #[error("invalid parse options: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

impl RsqlError {
    /// Creates an unsupported backend error.
    pub fn unsupported_backend(backend: impl Into<String>) -> Self {
        RsqlError::UnsupportedBackend {
            backend: backend.into(),
        }
    }

    /// Creates an invalid operator error without a suggestion.
    pub fn invalid_operator(operator: impl Into<String>) -> Self {
        RsqlError::InvalidOperator {
            operator: operator.into(),
            suggestion: None,
        }
    }

    /// Creates a malformed list value error.
    pub fn malformed_list_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        RsqlError::MalformedListValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a malformed segment error.
    pub fn malformed_segment(segment: impl Into<String>, position: usize) -> Self {
        RsqlError::MalformedSegment {
            segment: segment.into(),
            position,
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        RsqlError::Config {
            message: message.into(),
        }
    }

    /// Attaches an operator suggestion to an `InvalidOperator` error.
    ///
    /// Other variants are returned unchanged.
    pub fn with_suggestion(self, suggestion: Option<String>) -> Self {
        match self {
            RsqlError::InvalidOperator { operator, .. } => RsqlError::InvalidOperator {
                operator,
                suggestion,
            },
            other => other,
        }
    }
}
