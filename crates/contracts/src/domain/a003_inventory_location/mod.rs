pub mod aggregate;

pub use aggregate::{InventoryLocationRecord, InventorySnapshot};
