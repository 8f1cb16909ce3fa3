pub mod aggregate;

pub use aggregate::FreightRecord;
