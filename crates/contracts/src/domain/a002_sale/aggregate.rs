use serde::{Deserialize, Serialize};

use crate::domain::common::SourceRecord;

/// One sale transaction line from the sales extract (a002)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleRecord {
    pub vendor_no: Option<i64>,
    pub vendor_name: Option<String>,
    pub brand: Option<String>,
    pub store: Option<i64>,
    pub sales_price: Option<f64>,
    pub sales_quantity: Option<f64>,
    pub sales_dollars: Option<f64>,
    pub excise_tax: Option<f64>,
}

impl SaleRecord {
    /// SalesPrice × SalesQuantity, NULL when either side is NULL
    pub fn extended_price(&self) -> Option<f64> {
        Some(self.sales_price? * self.sales_quantity?)
    }
}

impl SourceRecord for SaleRecord {
    fn collection_name() -> &'static str {
        "sales"
    }

    fn required_columns() -> &'static [&'static str] {
        &[
            "VendorNo",
            "VendorName",
            "Brand",
            "Store",
            "SalesPrice",
            "SalesQuantity",
            "SalesDollars",
            "ExciseTax",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_price() {
        let sale = SaleRecord {
            sales_price: Some(15.0),
            sales_quantity: Some(4.0),
            ..Default::default()
        };
        assert_eq!(sale.extended_price(), Some(60.0));

        let missing_price = SaleRecord {
            sales_quantity: Some(4.0),
            ..Default::default()
        };
        assert_eq!(missing_price.extended_price(), None);
    }
}
