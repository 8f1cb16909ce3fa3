use std::path::Path;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr,
    Statement,
};

use super::error::DataError;

/// Open (or create) the SQLite store at `db_file`.
///
/// The returned handle is created once per run and passed to every stage.
pub async fn connect(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database {}", absolute_path.display());
    let conn = connect_url(&db_url).await?;
    Ok(conn)
}

/// In-memory store, used by tests
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    connect_url("sqlite::memory:").await
}

async fn connect_url(url: &str) -> Result<DatabaseConnection, DbErr> {
    // Single writer: one pooled connection also keeps an in-memory database alive
    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Quote an identifier taken verbatim from a file header
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub async fn table_exists<C: ConnectionTrait>(conn: &C, table: &str) -> Result<bool, DbErr> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            [table.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

/// Column names of a table, in declaration order
pub async fn table_columns<C: ConnectionTrait>(
    conn: &C,
    table: &str,
) -> Result<Vec<String>, DbErr> {
    let pragma = format!("PRAGMA table_info({});", quote_ident(table));
    let rows = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, pragma))
        .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get("", "name")?;
        columns.push(name);
    }
    Ok(columns)
}

/// Check that `table` exists and has every column in `required`.
/// SQLite compares column names case-insensitively, so do we.
pub async fn require_columns<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    required: &[&str],
) -> Result<(), DataError> {
    if !table_exists(conn, table).await? {
        return Err(DataError::InputUnavailable {
            table: table.to_string(),
        });
    }

    let columns = table_columns(conn, table).await?;
    for column in required {
        if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            return Err(DataError::SchemaMismatch {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("purchases"), "\"purchases\"");
        assert_eq!(quote_ident("Sales Qty"), "\"Sales Qty\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[tokio::test]
    async fn test_require_columns() {
        let conn = connect_in_memory().await.unwrap();
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "CREATE TABLE vendor_invoice (VendorNumber INTEGER, Freight REAL)".to_string(),
        ))
        .await
        .unwrap();

        assert!(table_exists(&conn, "vendor_invoice").await.unwrap());
        assert_eq!(
            table_columns(&conn, "vendor_invoice").await.unwrap(),
            vec!["VendorNumber".to_string(), "Freight".to_string()]
        );

        require_columns(&conn, "vendor_invoice", &["vendornumber", "Freight"])
            .await
            .unwrap();

        match require_columns(&conn, "vendor_invoice", &["Dollars"]).await {
            Err(DataError::SchemaMismatch { table, column }) => {
                assert_eq!(table, "vendor_invoice");
                assert_eq!(column, "Dollars");
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }

        assert!(matches!(
            require_columns(&conn, "sales", &["Store"]).await,
            Err(DataError::InputUnavailable { .. })
        ));
    }
}
