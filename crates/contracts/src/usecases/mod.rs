pub mod u501_ingest_files;
