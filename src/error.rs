//! Error types for sqlweave.

use thiserror::Error;

/// The main error type for query building and execution.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Operator outside the recognized set, rejected at the call site.
    #[error("Unsupported operator: '{0}'")]
    UnsupportedOperator(String),

    /// A join condition argument that resolves to no usable condition.
    #[error("Malformed join condition: {0}")]
    MalformedConditionShape(String),

    /// Join kind and condition combination that cannot be compiled.
    #[error("Unsupported join: {0}")]
    UnsupportedJoin(String),

    /// Raw fragment whose `?` markers do not match its parameters.
    #[error("Raw fragment has {markers} marker(s) but {params} parameter(s)")]
    ParamMismatch { markers: usize, params: usize },

    /// Failed to parse a textual fragment (condition, placeholder scan).
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error, surfaced unchanged from the driver.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a malformed condition error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedConditionShape(message.into())
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Execution(err.to_string())
    }
}

impl From<toml::de::Error> for QueryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for sqlweave operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_operator_error_names_token() {
        let err = QueryError::UnsupportedOperator("=~".to_string());
        assert_eq!(err.to_string(), "Unsupported operator: '=~'");
    }

    #[test]
    fn test_param_mismatch_display() {
        let err = QueryError::ParamMismatch { markers: 2, params: 1 };
        assert_eq!(err.to_string(), "Raw fragment has 2 marker(s) but 1 parameter(s)");
    }
}
