use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of loading one directory of flat files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub status: IngestStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Tables replaced during the run, in load order
    pub tables: Vec<IngestedTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Running,
    Completed,
}

/// One file loaded into one table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestedTable {
    pub file_name: String,
    pub table_name: String,
    pub columns: usize,
    pub rows: usize,
}

impl IngestReport {
    pub fn new() -> Self {
        Self {
            status: IngestStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            tables: Vec::new(),
        }
    }

    pub fn push(&mut self, table: IngestedTable) {
        self.tables.push(table);
    }

    pub fn complete(&mut self) {
        self.status = IngestStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

impl Default for IngestReport {
    fn default() -> Self {
        Self::new()
    }
}
