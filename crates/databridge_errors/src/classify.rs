use databridge_core::{ErrorDetail, ErrorKind, Severity};

fn contains_any(message: &str, needles: &[&str]) -> bool {
    let lower = message.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

fn derive_severity(kind: ErrorKind, message: &str) -> Severity {
    match kind {
        ErrorKind::System => Severity::Critical,
        ErrorKind::Transaction => Severity::High,
        ErrorKind::Connection | ErrorKind::Timeout => {
            if contains_any(message, &["timeout", "connection refused"]) {
                Severity::High
            } else {
                Severity::Medium
            }
        }
        ErrorKind::Validation => Severity::Low,
        _ => {
            if contains_any(message, &["fatal", "critical"]) {
                Severity::Critical
            } else if contains_any(message, &["error", "failed"]) {
                Severity::Medium
            } else {
                Severity::Low
            }
        }
    }
}

fn derive_recoverable(kind: ErrorKind, message: &str) -> bool {
    match kind {
        ErrorKind::System | ErrorKind::Validation => false,
        ErrorKind::Connection | ErrorKind::Timeout => true,
        _ => {
            if contains_any(message, &["invalid", "not found", "permission denied", "unauthorized"]) {
                false
            } else if contains_any(message, &["timeout", "connection", "temporary", "retry"]) {
                true
            } else {
                true
            }
        }
    }
}

/// Derives severity and recoverability from an error's kind and message.
/// This is the single place that taxonomy maps to operator-facing
/// treatment; everything else in the engine just asks "is this
/// recoverable" and "how bad is it".
pub fn classify(kind: ErrorKind, message: impl Into<String>) -> ErrorDetail {
    let message = message.into();
    let severity = derive_severity(kind, &message);
    let recoverable = derive_recoverable(kind, &message);
    ErrorDetail::new(kind, severity, message, recoverable)
}

pub fn is_recoverable(kind: ErrorKind, message: &str) -> bool {
    derive_recoverable(kind, message)
}
