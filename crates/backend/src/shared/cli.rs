use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "vendor-summary",
    about = "Load inventory extracts and build the vendor sales summary"
)]
pub struct Cli {
    /// What to run
    #[arg(value_enum, default_value_t = RunMode::All)]
    pub mode: RunMode,
}

/// What the binary should do on this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Load every CSV of the data directory
    Ingest,
    /// Rebuild the vendor summary table
    Summary,
    /// Ingest, then rebuild the summary
    All,
}

impl RunMode {
    pub fn runs_ingest(&self) -> bool {
        matches!(self, RunMode::Ingest | RunMode::All)
    }

    pub fn runs_summary(&self) -> bool {
        matches!(self, RunMode::Summary | RunMode::All)
    }
}
