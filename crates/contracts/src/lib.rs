//! Data contracts shared by the ingestion and summary pipelines.
//!
//! Naming follows the store layout: `aNNN` are base records loaded from flat
//! files, `pNNN` are derived projections, `uNNN` are use cases.

pub mod domain;
pub mod projections;
pub mod usecases;
