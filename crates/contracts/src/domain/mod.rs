pub mod common;

pub mod a001_purchase;
pub mod a002_sale;
pub mod a003_inventory_location;
pub mod a004_vendor_invoice;
