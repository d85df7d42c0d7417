use thiserror::Error;

/// The taxonomy from which every surfaced failure draws its classification.
///
/// `databridge_errors` derives severity and recoverability from this kind;
/// `databridge_core` only owns the enum itself since every trait in this
/// crate returns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Connection,
    Timeout,
    Transaction,
    DataSource,
    Query,
    Sync,
    System,
    Business,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Connection => "connection",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transaction => "transaction",
            ErrorKind::DataSource => "datasource",
            ErrorKind::Query => "query",
            ErrorKind::Sync => "sync",
            ErrorKind::System => "system",
            ErrorKind::Business => "business",
        }
    }
}

/// Engine-internal operation error.
///
/// Every trait seam (`DataSource`, `Catalog`, `Transaction`, `QueryBuilder`)
/// returns this type so callers can classify failures uniformly regardless
/// of which component raised them.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct EngineError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        mut self,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transaction, message)
    }

    pub fn data_source(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataSource, message)
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Query, message)
    }

    pub fn sync(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Sync, message)
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::System, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Business, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = EngineError::validation("interface_id is required");
        assert_eq!(err.to_string(), "validation: interface_id is required");
    }

    #[test]
    fn with_cause_is_retained_as_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = EngineError::connection("failed to dial").with_cause(io_err);
        assert!(err.source().is_some());
    }
}
