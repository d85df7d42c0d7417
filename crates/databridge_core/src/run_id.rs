use std::fmt;
use uuid::Uuid;

/// Per-run correlation id (SPEC_FULL §4): generated once per `Execute` call
/// and threaded through logging and the response so a caller can tie a
/// facade-level log line back to the response it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
