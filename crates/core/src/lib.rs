//! Domain logic for the HR master-data screens: CSV bulk import and export,
//! bench / non-billed reports, and the technology catalog cache.
//!
//! Nothing here talks to the database. Callers pass in snapshots and submit
//! results through their own persistence layer.

pub mod bench_report;
pub mod config;
pub mod csv_writer;
pub mod error;
pub mod import;
pub mod records;
pub mod tech_catalog;
pub mod types;
