use serde::{Deserialize, Serialize};

use crate::domain::common::SourceRecord;

/// Which inventory extract a location row was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventorySnapshot {
    Begin,
    End,
}

impl InventorySnapshot {
    /// Default table name of the snapshot
    pub fn table_name(&self) -> &'static str {
        match self {
            InventorySnapshot::Begin => "begin_inventory",
            InventorySnapshot::End => "end_inventory",
        }
    }
}

/// Store to City mapping taken from an inventory snapshot (a003).
/// Only these two columns of the inventory extracts are used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryLocationRecord {
    pub store: Option<i64>,
    pub city: Option<String>,
}

impl SourceRecord for InventoryLocationRecord {
    fn collection_name() -> &'static str {
        InventorySnapshot::Begin.table_name()
    }

    fn required_columns() -> &'static [&'static str] {
        &["Store", "City"]
    }
}
