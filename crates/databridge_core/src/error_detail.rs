use crate::error::ErrorKind;

/// How urgently an operator needs to act on a surfaced error. Derived by
/// `databridge_errors` from `ErrorKind` plus context; carried here only as
/// data so `ExecuteResponse` doesn't need to depend on that crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// The error shape embedded in an `ExecuteResponse` when `success` is false.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: String,
    pub recoverable: bool,
}

impl ErrorDetail {
    pub fn new(kind: ErrorKind, severity: Severity, message: impl Into<String>, recoverable: bool) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            recoverable,
        }
    }
}
