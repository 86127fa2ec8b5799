use crate::error::Error;
use std::path::Path;

/// Trait for observing repository operations.
///
/// The scan reports unreadable records here instead of aborting; the CLI
/// implements it with colored terminal output. All methods have default
/// no-op implementations.
pub trait RepositoryReporter {
    fn on_scan_start(&self, _category: &str, _sub_project: &str) {}
    fn on_record_loaded(&self, _name: &str) {}
    fn on_corrupt_record(&self, _path: &Path, _error: &Error) {}
    fn on_scan_complete(&self, _records: usize, _corrupt: usize) {}
    fn on_version_saved(&self, _name: &str, _version: u32) {}
    fn on_reference_updated(&self, _name: &str, _version: Option<u32>) {}
    fn on_dangling_reference(&self, _name: &str, _error: &Error) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl RepositoryReporter for SilentReporter {}
