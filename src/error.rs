//! Error types for datasql

use thiserror::Error;

/// Result type alias for datasql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the builder can report.
///
/// Statement assembly stops on the first failing fragment and returns that
/// error as is, so an adapter error reaches the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The dataset is missing something a statement needs (a source, a database).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Row shapes that cannot be decomposed into columns and values.
    #[error("shape error: {0}")]
    Shape(String),

    /// A runtime value that has no literal form.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Raised by a dialect while rendering a fragment.
    #[error("adapter error: {0}")]
    Adapter(String),

    /// An expression the adapter does not know how to render.
    #[error("unsupported expression type {0}")]
    UnsupportedExpression(String),

    /// Terminal operation failures (sql generation or the database itself).
    #[error("query error: {0}")]
    Query(String),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    pub fn adapter(message: impl Into<String>) -> Self {
        Self::Adapter(message.into())
    }

    pub fn unsupported_expression(kind: impl Into<String>) -> Self {
        Self::UnsupportedExpression(kind.into())
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape(_))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(_: std::fmt::Error) -> Self {
        Self::Adapter("failed to write sql fragment".into())
    }
}
