pub mod csv_table;
pub mod executor;

pub use executor::IngestExecutor;
