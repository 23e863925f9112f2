//! Export history log record.

use serde::{Deserialize, Serialize};

/// One completed export. The history list is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportHistoryEntry {
    pub filename: String,
    /// RFC 3339 timestamp of the export.
    pub timestamp: String,
    /// Number of entries written to the file.
    pub count: usize,
}
