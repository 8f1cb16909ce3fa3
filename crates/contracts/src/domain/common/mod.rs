//! Common types and traits for the base record types

pub mod source_record;

pub use source_record::SourceRecord;
