//! Vendor sales summary: loads flat purchase, sales, inventory and invoice
//! extracts into SQLite and derives a per vendor, brand and store summary.

pub mod domain;
pub mod projections;
pub mod shared;
pub mod usecases;
