use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement, TransactionTrait, Value,
};

use super::db::quote_ident;
use super::error::DataError;

/// SQLite's historical default for bound parameters per statement
const MAX_BIND_PARAMS: usize = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A fully materialized table: column definitions plus row values in column order
#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Vec<Value>>,
}

/// Replace `table` with `data`: drop, create, insert.
///
/// Runs in one transaction, so a failed write leaves the previous contents
/// in place. Returns the number of rows inserted.
pub async fn replace_table(
    conn: &DatabaseConnection,
    table: &str,
    data: &TableData,
) -> Result<u64, DataError> {
    if data.columns.is_empty() {
        return Err(DataError::NoColumns {
            table: table.to_string(),
        });
    }
    let width = data.columns.len();
    if let Some((row, values)) = data
        .rows
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != width)
    {
        return Err(DataError::RowWidth {
            table: table.to_string(),
            row,
            expected: width,
            found: values.len(),
        });
    }

    let txn = conn.begin().await?;

    txn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        format!("DROP TABLE IF EXISTS {};", quote_ident(table)),
    ))
    .await?;
    txn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        create_table_sql(table, &data.columns),
    ))
    .await?;

    let rows_per_batch = (MAX_BIND_PARAMS / width).max(1);
    let mut inserted = 0u64;
    for batch in data.rows.chunks(rows_per_batch) {
        let sql = insert_sql(table, &data.columns, batch.len());
        let values: Vec<Value> = batch.iter().flatten().cloned().collect();
        let result = txn
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                &sql,
                values,
            ))
            .await?;
        inserted += result.rows_affected();
    }

    txn.commit().await?;

    tracing::debug!("Replaced table {} with {} rows", table, inserted);
    Ok(inserted)
}

fn create_table_sql(table: &str, columns: &[ColumnDef]) -> String {
    let defs = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type.sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({});", quote_ident(table), defs)
}

fn insert_sql(table: &str, columns: &[ColumnDef], rows: usize) -> String {
    let names = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
    let tuples = vec![placeholders; rows].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES {};",
        quote_ident(table),
        names,
        tuples
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::{connect_in_memory, table_columns};

    fn two_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("Store", ColumnType::Integer),
            ColumnDef::new("City", ColumnType::Text),
        ]
    }

    #[test]
    fn test_generated_sql() {
        let columns = two_columns();
        assert_eq!(
            create_table_sql("stores", &columns),
            "CREATE TABLE \"stores\" (\"Store\" INTEGER, \"City\" TEXT);"
        );
        assert_eq!(
            insert_sql("stores", &columns, 2),
            "INSERT INTO \"stores\" (\"Store\", \"City\") VALUES (?, ?), (?, ?);"
        );
    }

    async fn count_rows(conn: &DatabaseConnection, table: &str) -> i64 {
        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!("SELECT COUNT(*) AS n FROM {}", quote_ident(table)),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn test_replace_table_replaces_contents() {
        let conn = connect_in_memory().await.unwrap();

        // More rows than fit in one batch
        let data = TableData {
            columns: two_columns(),
            rows: (0..1200)
                .map(|i| vec![Value::from(i as i64), Value::from(format!("City {}", i))])
                .collect(),
        };
        assert_eq!(replace_table(&conn, "stores", &data).await.unwrap(), 1200);
        assert_eq!(count_rows(&conn, "stores").await, 1200);

        let smaller = TableData {
            columns: vec![ColumnDef::new("Store", ColumnType::Integer)],
            rows: vec![vec![Value::from(1i64)], vec![Value::BigInt(None)]],
        };
        assert_eq!(replace_table(&conn, "stores", &smaller).await.unwrap(), 2);
        assert_eq!(count_rows(&conn, "stores").await, 2);
        assert_eq!(
            table_columns(&conn, "stores").await.unwrap(),
            vec!["Store".to_string()]
        );
    }

    #[tokio::test]
    async fn test_replace_table_rejects_ragged_rows() {
        let conn = connect_in_memory().await.unwrap();
        let data = TableData {
            columns: two_columns(),
            rows: vec![vec![Value::from(1i64)]],
        };
        assert!(matches!(
            replace_table(&conn, "stores", &data).await,
            Err(DataError::RowWidth {
                expected: 2,
                found: 1,
                ..
            })
        ));

        let empty = TableData::default();
        assert!(matches!(
            replace_table(&conn, "stores", &empty).await,
            Err(DataError::NoColumns { .. })
        ));
    }
}
