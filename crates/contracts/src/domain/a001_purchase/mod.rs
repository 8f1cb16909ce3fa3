pub mod aggregate;

pub use aggregate::PurchaseRecord;
