use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while building or exporting a declaration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeclaracionError {
    /// A record-source call failed. The declaration was not built.
    #[error("data unavailable: {operation} failed: {source}")]
    DataUnavailable {
        /// Name of the collaborator call that failed.
        operation: &'static str,
        /// Error reported by the collaborator.
        #[source]
        source: SourceError,
    },

    /// Invalid declaration period (year out of range, unknown quarter).
    #[error("invalid period: {0}")]
    Period(String),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A single amount or rate is outside what a declaration can carry.
    #[error("{field} out of range: {value}")]
    AmountOutOfRange {
        /// Record field or input name.
        field: &'static str,
        value: Decimal,
    },

    /// A running sum left the declarable amount range.
    #[error("sum of {field} exceeds the declarable amount range")]
    Overflow {
        /// Name of the summed quantity.
        field: &'static str,
    },
}

impl DeclaracionError {
    /// Wrap a collaborator failure for the named read operation.
    pub fn unavailable(operation: &'static str, source: SourceError) -> Self {
        tracing::warn!(operation, error = %source, "record source call failed");
        Self::DataUnavailable { operation, source }
    }

    /// True if this error came from a failed record-source call.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}

/// Error returned by a [`RecordSource`](super::RecordSource) implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a source error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a source error wrapping an underlying cause (I/O, driver, HTTP...).
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::with_cause("I/O error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unavailable_keeps_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "db timeout");
        let err = DeclaracionError::unavailable("issued_invoices", SourceError::from(io));
        assert!(err.is_data_unavailable());
        assert!(err.to_string().contains("issued_invoices"));

        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "I/O error");
        assert_eq!(source.source().unwrap().to_string(), "db timeout");
    }

    #[test]
    fn period_error_is_not_data_unavailable() {
        let err = DeclaracionError::Period("quarter 5".into());
        assert!(!err.is_data_unavailable());
        assert_eq!(err.to_string(), "invalid period: quarter 5");
    }

    #[test]
    fn range_errors_name_the_field() {
        let err = DeclaracionError::AmountOutOfRange {
            field: "base",
            value: Decimal::MAX,
        };
        assert!(err.to_string().starts_with("base out of range"));
        let err = DeclaracionError::Overflow { field: "vat" };
        assert_eq!(err.to_string(), "sum of vat exceeds the declarable amount range");
    }
}
