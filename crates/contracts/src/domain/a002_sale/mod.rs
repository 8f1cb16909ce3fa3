pub mod aggregate;

pub use aggregate::SaleRecord;
