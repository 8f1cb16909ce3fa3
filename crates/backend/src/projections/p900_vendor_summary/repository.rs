use contracts::projections::p900_vendor_summary::VendorSummaryRow;
use sea_orm::{DatabaseBackend, DatabaseConnection, FromQueryResult, Statement, Value};

use crate::shared::data::db::{quote_ident, require_columns};
use crate::shared::data::table_writer::{replace_table, ColumnDef, ColumnType, TableData};
use crate::shared::data::DataError;

/// Output columns, in table order
const COLUMNS: [(&str, ColumnType); 18] = [
    ("VendorNumber", ColumnType::Integer),
    ("VendorName", ColumnType::Text),
    ("Brand", ColumnType::Text),
    ("Description", ColumnType::Text),
    ("PurchasePrice", ColumnType::Real),
    ("TotalPurchaseQuantity", ColumnType::Real),
    ("TotalPurchaseDollars", ColumnType::Real),
    ("TotalFreightCost", ColumnType::Real),
    ("Store", ColumnType::Integer),
    ("City", ColumnType::Text),
    ("AvgSalesPrice", ColumnType::Real),
    ("TotalSalesQuantity", ColumnType::Integer),
    ("TotalSalesDollars", ColumnType::Real),
    ("TotalExciseTax", ColumnType::Real),
    ("GrossProfit", ColumnType::Real),
    ("GrossProfitMargin", ColumnType::Real),
    ("StockTurnover", ColumnType::Real),
    ("SalesToPurchaseRatio", ColumnType::Real),
];

fn column_names() -> Vec<&'static str> {
    COLUMNS.iter().map(|(name, _)| *name).collect()
}

fn to_values(row: &VendorSummaryRow) -> Vec<Value> {
    vec![
        row.vendor_number.into(),
        row.vendor_name.clone().into(),
        row.brand.clone().into(),
        row.description.clone().into(),
        row.purchase_price.into(),
        row.total_purchase_quantity.into(),
        row.total_purchase_dollars.into(),
        row.total_freight_cost.into(),
        row.store.into(),
        row.city.clone().into(),
        row.avg_sales_price.into(),
        row.total_sales_quantity.into(),
        row.total_sales_dollars.into(),
        row.total_excise_tax.into(),
        row.gross_profit.into(),
        row.gross_profit_margin.into(),
        row.stock_turnover.into(),
        row.sales_to_purchase_ratio.into(),
    ]
}

/// Replace the summary table with `rows`, keeping their order
pub async fn replace_all(
    conn: &DatabaseConnection,
    table: &str,
    rows: &[VendorSummaryRow],
) -> Result<u64, DataError> {
    let data = TableData {
        columns: COLUMNS
            .iter()
            .map(|(name, column_type)| ColumnDef::new(*name, *column_type))
            .collect(),
        rows: rows.iter().map(to_values).collect(),
    };
    replace_table(conn, table, &data).await
}

#[derive(Debug, FromQueryResult)]
struct Model {
    vendor_number: i64,
    vendor_name: String,
    brand: String,
    description: String,
    purchase_price: f64,
    total_purchase_quantity: f64,
    total_purchase_dollars: f64,
    total_freight_cost: f64,
    store: i64,
    city: String,
    avg_sales_price: f64,
    total_sales_quantity: i64,
    total_sales_dollars: f64,
    total_excise_tax: f64,
    gross_profit: f64,
    gross_profit_margin: f64,
    stock_turnover: f64,
    sales_to_purchase_ratio: f64,
}

impl From<Model> for VendorSummaryRow {
    fn from(m: Model) -> Self {
        VendorSummaryRow {
            vendor_number: m.vendor_number,
            vendor_name: m.vendor_name,
            brand: m.brand,
            description: m.description,
            purchase_price: m.purchase_price,
            total_purchase_quantity: m.total_purchase_quantity,
            total_purchase_dollars: m.total_purchase_dollars,
            total_freight_cost: m.total_freight_cost,
            store: m.store,
            city: m.city,
            avg_sales_price: m.avg_sales_price,
            total_sales_quantity: m.total_sales_quantity,
            total_sales_dollars: m.total_sales_dollars,
            total_excise_tax: m.total_excise_tax,
            gross_profit: m.gross_profit,
            gross_profit_margin: m.gross_profit_margin,
            stock_turnover: m.stock_turnover,
            sales_to_purchase_ratio: m.sales_to_purchase_ratio,
        }
    }
}

/// Read a persisted summary back in the order it was written
pub async fn list_all(
    conn: &DatabaseConnection,
    table: &str,
) -> Result<Vec<VendorSummaryRow>, DataError> {
    let columns = column_names();
    require_columns(conn, table, &columns).await?;

    let sql = format!(
        r#"
        SELECT
            VendorNumber AS vendor_number,
            VendorName AS vendor_name,
            Brand AS brand,
            Description AS description,
            PurchasePrice AS purchase_price,
            TotalPurchaseQuantity AS total_purchase_quantity,
            TotalPurchaseDollars AS total_purchase_dollars,
            TotalFreightCost AS total_freight_cost,
            Store AS store,
            City AS city,
            AvgSalesPrice AS avg_sales_price,
            TotalSalesQuantity AS total_sales_quantity,
            TotalSalesDollars AS total_sales_dollars,
            TotalExciseTax AS total_excise_tax,
            GrossProfit AS gross_profit,
            GrossProfitMargin AS gross_profit_margin,
            StockTurnover AS stock_turnover,
            SalesToPurchaseRatio AS sales_to_purchase_ratio
        FROM {}
        ORDER BY rowid
        "#,
        quote_ident(table)
    );

    let rows = Model::find_by_statement(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    #[tokio::test]
    async fn test_replace_and_list() {
        let conn = connect_in_memory().await.unwrap();
        let rows = vec![
            VendorSummaryRow {
                vendor_number: 1,
                vendor_name: "Acme".to_string(),
                brand: "BrandX".to_string(),
                purchase_price: 10.0,
                total_sales_quantity: 80,
                sales_to_purchase_ratio: 1.2,
                ..Default::default()
            },
            VendorSummaryRow {
                vendor_number: 2,
                city: "Springfield".to_string(),
                ..Default::default()
            },
        ];

        assert_eq!(replace_all(&conn, "vendor_sales_summary", &rows).await.unwrap(), 2);
        assert_eq!(list_all(&conn, "vendor_sales_summary").await.unwrap(), rows);

        // Full replace, never append
        assert_eq!(replace_all(&conn, "vendor_sales_summary", &rows[1..]).await.unwrap(), 1);
        assert_eq!(list_all(&conn, "vendor_sales_summary").await.unwrap(), rows[1..].to_vec());
    }

    #[tokio::test]
    async fn test_list_missing_table() {
        let conn = connect_in_memory().await.unwrap();
        assert!(matches!(
            list_all(&conn, "vendor_sales_summary").await,
            Err(DataError::InputUnavailable { .. })
        ));
    }
}
