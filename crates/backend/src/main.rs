use anyhow::Context;
use clap::Parser;
use vendor_summary::projections::p900_vendor_summary;
use vendor_summary::shared::cli::Cli;
use vendor_summary::shared::config;
use vendor_summary::shared::data::db;
use vendor_summary::shared::logger;
use vendor_summary::usecases::u501_ingest_files::IngestExecutor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = Cli::parse().mode;

    let (config, source) = config::load_config()?;
    logger::init(&config.logging)?;
    source.log();
    tracing::info!("Starting run: {:?}", mode);

    let conn = db::connect(&config::get_database_path(&config))
        .await
        .context("db init failed")?;

    if mode.runs_ingest() {
        IngestExecutor::new(&conn)
            .ingest_directory(&config::get_data_dir(&config))
            .await?;
    }

    if mode.runs_summary() {
        p900_vendor_summary::service::build_vendor_summary(
            &conn,
            &config.sources,
            &config.summary,
        )
        .await?;
    }

    Ok(())
}
