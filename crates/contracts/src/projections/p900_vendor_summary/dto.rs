use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the vendor sales summary (P900)
///
/// Grain: (VendorNumber, VendorName, Brand, Description, PurchasePrice, Store)
/// of the purchases with a positive price. Freight is a vendor-level total
/// repeated on every row of the vendor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VendorSummaryRow {
    // Dimensions
    pub vendor_number: i64,
    pub vendor_name: String,
    pub brand: String,
    pub description: String,
    pub purchase_price: f64,

    // Purchases
    pub total_purchase_quantity: f64,
    pub total_purchase_dollars: f64,
    pub total_freight_cost: f64,

    // Location
    pub store: i64,
    pub city: String,

    // Sales
    pub avg_sales_price: f64,
    pub total_sales_quantity: i64,
    pub total_sales_dollars: f64,
    pub total_excise_tax: f64,

    // Derived metrics
    pub gross_profit: f64,
    pub gross_profit_margin: f64,
    pub stock_turnover: f64,
    pub sales_to_purchase_ratio: f64,
}

/// Outcome of one summary build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub table_name: String,
    pub rows: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// Elapsed milliseconds per stage
    pub aggregate_ms: u128,
    pub clean_ms: u128,
    pub persist_ms: u128,
}

impl SummaryReport {
    pub fn total_ms(&self) -> u128 {
        self.aggregate_ms + self.clean_ms + self.persist_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_are_pascal_case() {
        let row = VendorSummaryRow {
            vendor_number: 7,
            sales_to_purchase_ratio: 1.2,
            ..Default::default()
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["VendorNumber"], 7);
        assert_eq!(json["SalesToPurchaseRatio"], 1.2);
        assert_eq!(json["City"], "");
    }
}
