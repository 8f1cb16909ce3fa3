pub mod report;

pub use report::{IngestReport, IngestStatus, IngestedTable};
