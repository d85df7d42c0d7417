use crate::value::Value;

/// Per-batch/per-run row counters, folded into `ExecuteResponse::metadata`
/// under the `"sync_result"` key (§4 Supplemented features).
#[derive(Debug, Clone, Default)]
pub struct SyncCounts {
    pub fetched: u64,
    pub inserted: u64,
    pub updated: u64,
    pub deleted: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl SyncCounts {
    pub fn merge(&mut self, other: &SyncCounts) {
        self.fetched += other.fetched;
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Full structured outcome of a sync strategy run.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub counts: SyncCounts,
    pub pages_fetched: u64,
    pub new_watermark: Option<Value>,
    pub warnings: Vec<String>,
}

impl SyncResult {
    pub fn empty() -> Self {
        Self {
            counts: SyncCounts::default(),
            pages_fetched: 0,
            new_watermark: None,
            warnings: Vec::new(),
        }
    }
}
