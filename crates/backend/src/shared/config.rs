use contracts::domain::a001_purchase::PurchaseRecord;
use contracts::domain::a002_sale::SaleRecord;
use contracts::domain::a003_inventory_location::InventorySnapshot;
use contracts::domain::a004_vendor_invoice::FreightRecord;
use contracts::domain::common::SourceRecord;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub sources: SourceTables,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Directory scanned for `*.csv` files
    pub data_dir: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

/// Names of the base tables the summary reads
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SourceTables {
    pub purchases: String,
    pub sales: String,
    pub begin_inventory: String,
    pub end_inventory: String,
    pub vendor_invoice: String,
}

impl Default for SourceTables {
    fn default() -> Self {
        Self {
            purchases: PurchaseRecord::collection_name().to_string(),
            sales: SaleRecord::collection_name().to_string(),
            begin_inventory: InventorySnapshot::Begin.table_name().to_string(),
            end_inventory: InventorySnapshot::End.table_name().to_string(),
            vendor_invoice: FreightRecord::collection_name().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummaryConfig {
    /// Output table, replaced in full on every run
    pub table: String,
    /// Rows written to the debug log after each stage
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_preview_rows() -> usize {
    5
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            table: "vendor_sales_summary".to_string(),
            preview_rows: default_preview_rows(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub dir: String,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "target/logs".to_string(),
            file: "vendor_summary.log".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/inventory.db"

[ingest]
data_dir = "data"

[summary]
table = "vendor_sales_summary"
"#;

/// Where the configuration was read from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Embedded default; carries the path that was probed, if any
    Embedded(Option<PathBuf>),
}

impl ConfigSource {
    /// Report the source once logging is up
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                tracing::info!("Loading config from: {}", path.display());
            }
            ConfigSource::Embedded(probed) => {
                if let Some(path) = probed {
                    tracing::warn!("config.toml not found at: {}", path.display());
                }
                tracing::info!("Using default embedded configuration");
            }
        }
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// The source is returned so it can be logged once the subscriber is up.
pub fn load_config() -> anyhow::Result<(Config, ConfigSource)> {
    let mut probed = None;
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                let config = parse_config(&contents)?;
                return Ok((config, ConfigSource::File(config_path)));
            }
            probed = Some(config_path);
        }
    }

    Ok((parse_config(DEFAULT_CONFIG)?, ConfigSource::Embedded(probed)))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Resolve a configured path: absolute paths are kept, relative paths
/// are taken relative to the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(path_str)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Get the CSV directory. Unlike the store paths, a relative data
/// directory is taken relative to the working directory.
pub fn get_data_dir(config: &Config) -> PathBuf {
    PathBuf::from(&config.ingest.data_dir)
}
