use contracts::domain::a001_purchase::PurchaseRecord;
use contracts::domain::common::SourceRecord;
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Statement};

use crate::shared::data::db::{quote_ident, require_columns};
use crate::shared::data::DataError;

#[derive(Debug, FromQueryResult)]
struct Model {
    vendor_number: Option<i64>,
    vendor_name: Option<String>,
    brand: Option<String>,
    description: Option<String>,
    purchase_price: Option<f64>,
    store: Option<i64>,
    quantity: Option<f64>,
    dollars: Option<f64>,
}

impl From<Model> for PurchaseRecord {
    fn from(m: Model) -> Self {
        PurchaseRecord {
            vendor_number: m.vendor_number,
            vendor_name: m.vendor_name,
            brand: m.brand,
            description: m.description,
            purchase_price: m.purchase_price,
            store: m.store,
            quantity: m.quantity,
            dollars: m.dollars,
        }
    }
}

/// Read every purchase line of `table`, in storage order
pub async fn load_all<C: ConnectionTrait>(
    conn: &C,
    table: &str,
) -> Result<Vec<PurchaseRecord>, DataError> {
    require_columns(conn, table, PurchaseRecord::required_columns()).await?;

    // Loaded columns keep whatever type was inferred from the file; cast to the record types
    let sql = format!(
        r#"
        SELECT
            CAST(VendorNumber AS INTEGER) AS vendor_number,
            CAST(VendorName AS TEXT) AS vendor_name,
            CAST(Brand AS TEXT) AS brand,
            CAST(Description AS TEXT) AS description,
            CAST(PurchasePrice AS REAL) AS purchase_price,
            CAST(Store AS INTEGER) AS store,
            CAST(Quantity AS REAL) AS quantity,
            CAST(Dollars AS REAL) AS dollars
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
