use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::usecases::u501_ingest_files::{IngestReport, IngestedTable};
use sea_orm::DatabaseConnection;

use super::csv_table::read_csv;
use crate::shared::data::table_writer::replace_table;
use crate::shared::format::{format_elapsed, format_number};

/// Loads flat files into the store, one table per file.
///
/// Each load is a full replace of the same-named table; there is no
/// validation beyond the file being parseable.
pub struct IngestExecutor<'a> {
    conn: &'a DatabaseConnection,
}

impl<'a> IngestExecutor<'a> {
    pub fn new(conn: &'a DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Load every `*.csv` file of `dir`, in file name order
    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestReport> {
        let start = Instant::now();
        let mut report = IngestReport::new();

        let files = csv_files(dir)?;
        if files.is_empty() {
            tracing::warn!("No CSV files found in {}", dir.display());
        }

        for path in files {
            let table = self.ingest_file(&path).await?;
            report.push(table);
        }

        report.complete();
        tracing::info!("-----------INGESTION COMPLETE-----------");
        tracing::info!(
            "Loaded {} tables, {} rows. Total time taken {}",
            report.tables.len(),
            format_number(report.total_rows()),
            format_elapsed(start.elapsed())
        );
        Ok(report)
    }

    /// Load one file into the table named after the file stem
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestedTable> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let table_name = table_name_for(path)
            .with_context(|| format!("cannot derive a table name from {}", path.display()))?;

        tracing::info!("Ingesting file {} in db", file_name);
        let start = Instant::now();

        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let table = read_csv(file).with_context(|| format!("failed to parse {}", path.display()))?;
        let columns = table.headers.len();
        let data = table.into_table_data();

        let rows = replace_table(self.conn, &table_name, &data)
            .await
            .with_context(|| format!("failed to write table '{}'", table_name))?;

        tracing::info!(
            "Table {} replaced: {} columns, {} rows in {}",
            table_name,
            columns,
            format_number(rows as usize),
            format_elapsed(start.elapsed())
        );

        Ok(IngestedTable {
            file_name,
            table_name,
            columns,
            rows: rows as usize,
        })
    }
}

fn is_csv(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
}

fn table_name_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read data directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if is_csv(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::{connect_in_memory, table_columns, table_exists};
    use contracts::usecases::u501_ingest_files::IngestStatus;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    async fn count(conn: &DatabaseConnection, table: &str) -> i64 {
        let row = conn
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!("SELECT COUNT(*) AS n FROM \"{}\"", table),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[test]
    fn test_table_name_for() {
        assert_eq!(table_name_for(Path::new("data/purchases.csv")).as_deref(), Some("purchases"));
        assert_eq!(
            table_name_for(Path::new("data/begin_inventory.CSV")).as_deref(),
            Some("begin_inventory")
        );
    }

    #[tokio::test]
    async fn test_ingest_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "vendor_invoice.csv", "VendorNumber,Freight\n1,50.0\n2,7.5\n");
        write(dir.path(), "sales.CSV", "VendorNo,Store\n1,5\n");
        write(dir.path(), "notes.txt", "not a table");

        let conn = connect_in_memory().await.unwrap();
        let executor = IngestExecutor::new(&conn);
        let report = executor.ingest_directory(dir.path()).await.unwrap();

        assert_eq!(report.status, IngestStatus::Completed);
        assert!(report.completed_at.is_some());
        assert_eq!(
            report.tables.iter().map(|t| t.table_name.as_str()).collect::<Vec<_>>(),
            vec!["sales", "vendor_invoice"]
        );
        assert_eq!(report.total_rows(), 3);
        assert!(!table_exists(&conn, "notes").await.unwrap());
        assert_eq!(
            table_columns(&conn, "vendor_invoice").await.unwrap(),
            vec!["VendorNumber".to_string(), "Freight".to_string()]
        );
    }

    #[tokio::test]
    async fn test_reingest_replaces_table() {
        let dir = tempfile::tempdir().unwrap();
        let conn = connect_in_memory().await.unwrap();
        let executor = IngestExecutor::new(&conn);

        write(dir.path(), "sales.csv", "VendorNo,Store\n1,5\n2,6\n3,7\n");
        executor.ingest_file(&dir.path().join("sales.csv")).await.unwrap();
        assert_eq!(count(&conn, "sales").await, 3);

        write(dir.path(), "sales.csv", "VendorNo,Store,City\n9,9,Ashborne\n");
        let table = executor.ingest_file(&dir.path().join("sales.csv")).await.unwrap();
        assert_eq!(table.rows, 1);
        assert_eq!(table.columns, 3);
        assert_eq!(count(&conn, "sales").await, 1);
    }

    #[tokio::test]
    async fn test_unparseable_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a_good.csv", "Store\n1\n");
        write(dir.path(), "b_bad.csv", "Store,City\n1,Springfield,extra\n");

        let conn = connect_in_memory().await.unwrap();
        let err = IngestExecutor::new(&conn)
            .ingest_directory(dir.path())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("b_bad.csv"));
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let conn = connect_in_memory().await.unwrap();
        let missing = Path::new("/nonexistent/vendor-summary-data");
        assert!(IngestExecutor::new(&conn).ingest_directory(missing).await.is_err());
    }
}
