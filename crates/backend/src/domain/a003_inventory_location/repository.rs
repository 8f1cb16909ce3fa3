use contracts::domain::a003_inventory_location::InventoryLocationRecord;
use contracts::domain::common::SourceRecord;
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Statement};

use crate::shared::data::db::{quote_ident, require_columns};
use crate::shared::data::DataError;

#[derive(Debug, FromQueryResult)]
struct Model {
    store: Option<i64>,
    city: Option<String>,
}

/// Distinct (Store, City) pairs of one inventory snapshot with a known city.
///
/// Only the location columns are read; stock levels are not needed.
pub async fn load_locations<C: ConnectionTrait>(
    conn: &C,
    table: &str,
) -> Result<Vec<InventoryLocationRecord>, DataError> {
    require_columns(conn, table, InventoryLocationRecord::required_columns()).await?;

    let sql = format!(
        r#"
        SELECT DISTINCT
            CAST(Store AS INTEGER) AS store,
            CAST(City AS TEXT) AS city
        FROM {}
        WHERE City IS NOT NULL
        ORDER BY store, city
        "#,
        quote_ident(table)
    );

    let rows = Model::find_by_statement(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|m| InventoryLocationRecord {
            store: m.store,
            city: m.city,
        })
        .collect())
}
