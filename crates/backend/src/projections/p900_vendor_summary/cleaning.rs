//! Stage 2 of the vendor summary: resolve NULLs, normalize, derive metrics.

use contracts::projections::p900_vendor_summary::VendorSummaryRow;

use super::aggregation::JoinedSummaryRow;

/// Round to `decimals` places, ties to even on the exact stored value
/// (2.675 is stored as 2.67499.. and becomes 2.67; 0.125 becomes 0.12).
/// Float formatting rounds the exact binary value, never a scaled copy.
pub fn round_half_even(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// `numerator / denominator`, or 0 when the denominator is 0
fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn clean_summary(rows: Vec<JoinedSummaryRow>) -> Vec<VendorSummaryRow> {
    rows.into_iter().map(clean_row).collect()
}

fn clean_row(row: JoinedSummaryRow) -> VendorSummaryRow {
    // NULL becomes the zero value of the column type
    let mut cleaned = VendorSummaryRow {
        vendor_number: row.vendor_number.unwrap_or_default(),
        vendor_name: row.vendor_name.unwrap_or_default(),
        brand: row.brand.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        purchase_price: row.purchase_price,
        total_purchase_quantity: row.total_purchase_quantity.unwrap_or_default(),
        total_purchase_dollars: row.total_purchase_dollars.unwrap_or_default(),
        total_freight_cost: row.total_freight_cost.unwrap_or_default(),
        store: row.store.unwrap_or_default(),
        city: row.city.unwrap_or_default(),
        avg_sales_price: row.avg_sales_price.unwrap_or_default(),
        // Truncates toward zero
        total_sales_quantity: row.total_sales_quantity.unwrap_or_default() as i64,
        total_sales_dollars: row.total_sales_dollars.unwrap_or_default(),
        total_excise_tax: row.total_excise_tax.unwrap_or_default(),
        ..Default::default()
    };

    cleaned.avg_sales_price = round_half_even(cleaned.avg_sales_price, 2);

    cleaned.vendor_name = cleaned.vendor_name.trim().to_string();
    cleaned.description = cleaned.description.trim().to_string();

    derive_metrics(&mut cleaned);
    cleaned
}

/// Profitability columns. Guards test the filled source columns, never the result.
fn derive_metrics(row: &mut VendorSummaryRow) {
    let sales_quantity = row.total_sales_quantity as f64;

    row.gross_profit = (row.avg_sales_price - row.purchase_price) * sales_quantity;
    row.gross_profit_margin = ratio_or_zero(row.gross_profit, row.total_sales_dollars) * 100.0;
    row.stock_turnover = ratio_or_zero(sales_quantity, row.total_purchase_quantity);
    row.sales_to_purchase_ratio =
        ratio_or_zero(row.total_sales_dollars, row.total_purchase_dollars);
}
