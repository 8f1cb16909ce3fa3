use contracts::domain::a002_sale::SaleRecord;
use contracts::domain::common::SourceRecord;
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Statement};

use crate::shared::data::db::{quote_ident, require_columns};
use crate::shared::data::DataError;

#[derive(Debug, FromQueryResult)]
struct Model {
    vendor_no: Option<i64>,
    vendor_name: Option<String>,
    brand: Option<String>,
    store: Option<i64>,
    sales_price: Option<f64>,
    sales_quantity: Option<f64>,
    sales_dollars: Option<f64>,
    excise_tax: Option<f64>,
}

impl From<Model> for SaleRecord {
    fn from(m: Model) -> Self {
        SaleRecord {
            vendor_no: m.vendor_no,
            vendor_name: m.vendor_name,
            brand: m.brand,
            store: m.store,
            sales_price: m.sales_price,
            sales_quantity: m.sales_quantity,
            sales_dollars: m.sales_dollars,
            excise_tax: m.excise_tax,
        }
    }
}

/// Read every sale line of `table`, in storage order
pub async fn load_all<C: ConnectionTrait>(
    conn: &C,
    table: &str,
) -> Result<Vec<SaleRecord>, DataError> {
    require_columns(conn, table, SaleRecord::required_columns()).await?;

    let sql = format!(
        r#"
        SELECT
            CAST(VendorNo AS INTEGER) AS vendor_no,
            CAST(VendorName AS TEXT) AS vendor_name,
            CAST(Brand AS TEXT) AS brand,
            CAST(Store AS INTEGER) AS store,
            CAST(SalesPrice AS REAL) AS sales_price,
            CAST(SalesQuantity AS REAL) AS sales_quantity,
            CAST(SalesDollars AS REAL) AS sales_dollars,
            CAST(ExciseTax AS REAL) AS excise_tax
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
