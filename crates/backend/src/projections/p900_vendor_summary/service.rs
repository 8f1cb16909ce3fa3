use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use contracts::projections::p900_vendor_summary::{SummaryReport, VendorSummaryRow};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use super::sources::SummarySources;
use super::{aggregation, cleaning, repository};
use crate::shared::config::{SourceTables, SummaryConfig};
use crate::shared::format::{format_elapsed, format_number};

/// Debug-level preview of the first rows of a stage, as JSON
fn log_preview<T: Serialize>(stage: &str, rows: &[T], limit: usize) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let head = &rows[..rows.len().min(limit)];
    match serde_json::to_string_pretty(head) {
        Ok(json) => tracing::debug!(
            "{} preview ({} of {} rows):\n{}",
            stage,
            head.len(),
            rows.len(),
            json
        ),
        Err(e) => tracing::debug!("{} preview unavailable: {}", stage, e),
    }
}

/// Aggregate and clean, without touching the output table
pub async fn compute_vendor_summary(
    conn: &DatabaseConnection,
    tables: &SourceTables,
) -> Result<Vec<VendorSummaryRow>> {
    let sources = SummarySources::load(conn, tables)
        .await
        .context("failed to load summary sources")?;
    Ok(cleaning::clean_summary(aggregation::aggregate(&sources)))
}

/// Rebuild the vendor summary table (P900) from the base tables.
///
/// The output table is replaced in full; nothing is written if any stage fails.
pub async fn build_vendor_summary(
    conn: &DatabaseConnection,
    tables: &SourceTables,
    config: &SummaryConfig,
) -> Result<SummaryReport> {
    let started_at = Utc::now();

    tracing::info!("Creating Vendor Summary Table....");
    let stage = Instant::now();
    let sources = SummarySources::load(conn, tables)
        .await
        .context("failed to load summary sources")?;
    let joined = aggregation::aggregate(&sources);
    let aggregate_elapsed = stage.elapsed();
    tracing::info!(
        "Vendor summary joined: {} rows in {}",
        format_number(joined.len()),
        format_elapsed(aggregate_elapsed)
    );
    log_preview("Joined summary", &joined, config.preview_rows);

    tracing::info!("Cleaning Data....");
    let stage = Instant::now();
    let cleaned = cleaning::clean_summary(joined);
    let clean_elapsed = stage.elapsed();
    tracing::info!("Cleaning done in {}", format_elapsed(clean_elapsed));
    log_preview("Cleaned summary", &cleaned, config.preview_rows);

    tracing::info!("Ingesting Data....");
    let stage = Instant::now();
    let written = repository::replace_all(conn, &config.table, &cleaned)
        .await
        .with_context(|| format!("failed to write table '{}'", config.table))?;
    let persist_elapsed = stage.elapsed();
    tracing::info!(
        "Table {} replaced with {} rows in {}",
        config.table,
        format_number(written as usize),
        format_elapsed(persist_elapsed)
    );

    let report = SummaryReport {
        table_name: config.table.clone(),
        rows: cleaned.len(),
        started_at,
        completed_at: Utc::now(),
        aggregate_ms: aggregate_elapsed.as_millis(),
        clean_ms: clean_elapsed.as_millis(),
        persist_ms: persist_elapsed.as_millis(),
    };
    tracing::info!("Completed in {}ms", report.total_ms());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use crate::shared::data::table_writer::{replace_table, ColumnDef, ColumnType, TableData};
    use crate::shared::data::DataError;
    use sea_orm::Value;

    fn int(v: i64) -> Value {
        Value::from(v)
    }

    fn real(v: f64) -> Value {
        Value::from(v)
    }

    fn text(v: &str) -> Value {
        Value::from(v.to_string())
    }

    async fn create(
        conn: &DatabaseConnection,
        table: &str,
        columns: &[(&str, ColumnType)],
        rows: Vec<Vec<Value>>,
    ) {
        let data = TableData {
            columns: columns
                .iter()
                .map(|(name, t)| ColumnDef::new(*name, *t))
                .collect(),
            rows,
        };
        replace_table(conn, table, &data).await.unwrap();
    }

    /// The Acme scenario plus a zero-priced purchase and an unsold purchase
    async fn seed(conn: &DatabaseConnection) {
        use ColumnType::*;

        create(
            conn,
            "purchases",
            &[
                ("VendorNumber", Integer),
                ("VendorName", Text),
                ("Brand", Text),
                ("Description", Text),
                ("PurchasePrice", Real),
                ("Store", Integer),
                ("Quantity", Integer),
                ("Dollars", Real),
            ],
            vec![
                vec![
                    int(1),
                    text("Acme "),
                    text("BrandX"),
                    text("Desc "),
                    real(10.0),
                    int(5),
                    int(100),
                    real(1000.0),
                ],
                vec![
                    int(1),
                    text("Acme "),
                    text("BrandY"),
                    text("Free sample"),
                    real(0.0),
                    int(5),
                    int(3),
                    real(0.0),
                ],
                vec![
                    int(2),
                    text("Bolt"),
                    text("BrandZ"),
                    text("Gin"),
                    real(4.5),
                    int(9),
                    int(10),
                    real(45.0),
                ],
            ],
        )
        .await;

        create(
            conn,
            "sales",
            &[
                ("VendorNo", Integer),
                ("VendorName", Text),
                ("Brand", Text),
                ("Store", Integer),
                ("SalesPrice", Real),
                ("SalesQuantity", Integer),
                ("SalesDollars", Real),
                ("ExciseTax", Real),
            ],
            vec![vec![
                int(1),
                text("Acme"),
                text("BrandX"),
                int(5),
                real(15.0),
                int(80),
                real(1200.0),
                real(10.0),
            ]],
        )
        .await;

        for table in ["begin_inventory", "end_inventory"] {
            create(
                conn,
                table,
                &[("InventoryId", Text), ("Store", Integer), ("City", Text)],
                vec![vec![text("5_SPRINGFIELD_1"), int(5), text("Springfield")]],
            )
            .await;
        }

        create(
            conn,
            "vendor_invoice",
            &[("VendorNumber", Integer), ("Freight", Real)],
            vec![vec![int(1), real(50.0)]],
        )
        .await;
    }

    #[tokio::test]
    async fn test_build_vendor_summary() {
        let conn = connect_in_memory().await.unwrap();
        seed(&conn).await;

        let config = SummaryConfig::default();
        let report = build_vendor_summary(&conn, &SourceTables::default(), &config)
            .await
            .unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.table_name, "vendor_sales_summary");

        let rows = repository::list_all(&conn, &config.table).await.unwrap();
        assert_eq!(rows.len(), 2);

        let acme = &rows[0];
        assert_eq!(acme.vendor_number, 1);
        assert_eq!(acme.vendor_name, "Acme");
        assert_eq!(acme.brand, "BrandX");
        assert_eq!(acme.description, "Desc");
        assert_eq!(acme.total_purchase_quantity, 100.0);
        assert_eq!(acme.total_purchase_dollars, 1000.0);
        assert_eq!(acme.total_freight_cost, 50.0);
        assert_eq!(acme.city, "Springfield");
        assert_eq!(acme.avg_sales_price, 15.0);
        assert_eq!(acme.total_sales_quantity, 80);
        assert_eq!(acme.total_sales_dollars, 1200.0);
        assert_eq!(acme.total_excise_tax, 10.0);
        assert_eq!(acme.gross_profit, 400.0);
        assert!((acme.gross_profit_margin - 33.333333).abs() < 1e-4);
        assert!((acme.stock_turnover - 0.8).abs() < 1e-12);
        assert!((acme.sales_to_purchase_ratio - 1.2).abs() < 1e-12);

        // Purchase without any sale, store or freight match
        let bolt = &rows[1];
        assert_eq!(bolt.vendor_number, 2);
        assert_eq!(bolt.city, "");
        assert_eq!(bolt.total_freight_cost, 0.0);
        assert_eq!(bolt.total_sales_quantity, 0);
        assert_eq!(bolt.gross_profit_margin, 0.0);
        assert_eq!(bolt.stock_turnover, 0.0);
        assert_eq!(bolt.sales_to_purchase_ratio, 0.0);

        // Zero-priced purchase excluded
        assert!(rows.iter().all(|r| r.purchase_price > 0.0));
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let conn = connect_in_memory().await.unwrap();
        seed(&conn).await;
        let config = SummaryConfig::default();

        build_vendor_summary(&conn, &SourceTables::default(), &config).await.unwrap();
        let first = repository::list_all(&conn, &config.table).await.unwrap();
        build_vendor_summary(&conn, &SourceTables::default(), &config).await.unwrap();
        let second = repository::list_all(&conn, &config.table).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(
            compute_vendor_summary(&conn, &SourceTables::default()).await.unwrap(),
            first
        );
    }

    #[tokio::test]
    async fn test_missing_source_aborts_without_output() {
        let conn = connect_in_memory().await.unwrap();
        seed(&conn).await;

        let tables = SourceTables {
            vendor_invoice: "vendor_invoice_2017".to_string(),
            ..SourceTables::default()
        };
        let err = build_vendor_summary(&conn, &tables, &SummaryConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InputUnavailable { table }) if table == "vendor_invoice_2017"
        ));

        assert!(repository::list_all(&conn, "vendor_sales_summary").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_column_is_schema_mismatch() {
        let conn = connect_in_memory().await.unwrap();
        seed(&conn).await;
        create(
            &conn,
            "sales",
            &[("VendorNo", ColumnType::Integer), ("Brand", ColumnType::Text)],
            vec![],
        )
        .await;

        let err = compute_vendor_summary(&conn, &SourceTables::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::SchemaMismatch { table, .. }) if table == "sales"
        ));
    }
}
