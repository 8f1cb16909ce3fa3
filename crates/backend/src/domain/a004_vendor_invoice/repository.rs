use contracts::domain::a004_vendor_invoice::FreightRecord;
use contracts::domain::common::SourceRecord;
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Statement};

use crate::shared::data::db::{quote_ident, require_columns};
use crate::shared::data::DataError;

#[derive(Debug, FromQueryResult)]
struct Model {
    vendor_number: Option<i64>,
    freight: Option<f64>,
}

/// Read the freight column of every vendor invoice line
pub async fn load_freight<C: ConnectionTrait>(
    conn: &C,
    table: &str,
) -> Result<Vec<FreightRecord>, DataError> {
    require_columns(conn, table, FreightRecord::required_columns()).await?;

    let sql = format!(
        r#"
        SELECT
            CAST(VendorNumber AS INTEGER) AS vendor_number,
            CAST(Freight AS REAL) AS freight
        FROM {}
        ORDER BY rowid
        "#,
        quote_ident(table)
    );

    let rows = Model::find_by_statement(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|m| FreightRecord {
            vendor_number: m.vendor_number,
            freight: m.freight,
        })
        .collect())
}
