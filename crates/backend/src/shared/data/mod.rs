pub mod db;
pub mod error;
pub mod table_writer;

pub use error::DataError;
