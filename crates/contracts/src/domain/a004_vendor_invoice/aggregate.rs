use serde::{Deserialize, Serialize};

use crate::domain::common::SourceRecord;

/// Freight cost of one vendor invoice line (a004)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FreightRecord {
    pub vendor_number: Option<i64>,
    pub freight: Option<f64>,
}

impl SourceRecord for FreightRecord {
    fn collection_name() -> &'static str {
        "vendor_invoice"
    }

    fn required_columns() -> &'static [&'static str] {
        &["VendorNumber", "Freight"]
    }
}
