pub mod dto;

pub use dto::{SummaryReport, VendorSummaryRow};
