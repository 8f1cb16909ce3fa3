use serde::{Deserialize, Serialize};

use crate::domain::common::SourceRecord;

/// One purchase transaction line from the purchases extract (a001)
///
/// Every field is optional: an empty cell in the source file is stored as NULL.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PurchaseRecord {
    pub vendor_number: Option<i64>,
    pub vendor_name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub purchase_price: Option<f64>,
    pub store: Option<i64>,
    pub quantity: Option<f64>,
    pub dollars: Option<f64>,
}

impl PurchaseRecord {
    /// Only lines with a strictly positive purchase price take part in the summary.
    /// A missing price never qualifies.
    pub fn has_positive_price(&self) -> bool {
        matches!(self.purchase_price, Some(price) if price > 0.0)
    }
}

impl SourceRecord for PurchaseRecord {
    fn collection_name() -> &'static str {
        "purchases"
    }

    fn required_columns() -> &'static [&'static str] {
        &[
            "VendorNumber",
            "VendorName",
            "Brand",
            "Description",
            "PurchasePrice",
            "Store",
            "Quantity",
            "Dollars",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_price_filter() {
        let mut record = PurchaseRecord {
            purchase_price: Some(10.0),
            ..Default::default()
        };
        assert!(record.has_positive_price());

        record.purchase_price = Some(0.0);
        assert!(!record.has_positive_price());

        record.purchase_price = Some(-1.5);
        assert!(!record.has_positive_price());

        record.purchase_price = None;
        assert!(!record.has_positive_price());
    }

    #[test]
    fn test_serializes_with_source_column_names() {
        let record = PurchaseRecord {
            vendor_number: Some(1),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["VendorNumber"], 1);
        assert!(json["PurchasePrice"].is_null());
    }
}
