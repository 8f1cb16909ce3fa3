pub mod aggregation;
pub mod cleaning;
pub mod repository;
pub mod service;
pub mod sources;
