pub mod p900_vendor_summary;
