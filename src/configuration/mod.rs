//! Scan configurations handed to the scan engine.

mod scan_configuration;

pub use scan_configuration::{PolicyIdentifier, ScanConfiguration};
