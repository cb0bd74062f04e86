//! Inbound scan requests.
//!
//! A `ScanRequest` is the decoded body of a scan trigger. Every field is
//! optional; absent fields leave the configured defaults in place.

mod scan_request;

pub use scan_request::ScanRequest;
