//! Per-run counters and diagnostics.

use core::fmt;
use std::path::PathBuf;

use crate::Category;

/// One source that was not staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// The category the source was configured under.
    pub category: Category,
    /// The source path as written in the config.
    pub raw: String,
    /// The resolved source path.
    pub source: PathBuf,
    /// Why the source was skipped.
    pub reason: SkipReason,
}

/// Why a source was not staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The resolved path does not exist.
    Missing,
    /// Copying or hashing failed.
    Failed(String),
}

/// Aggregate counters and diagnostics for one backup run.
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    /// Number of sources staged and recorded in the manifest.
    pub copied: u64,
    /// Sources that were missing or failed to copy.
    pub skipped: Vec<SkippedItem>,
    /// Non-fatal warnings, such as a manifest write failure.
    pub warnings: Vec<String>,
}

impl RunReport {
    /// Record a staged source.
    pub fn add_copied(&mut self) {
        self.copied += 1;
    }

    /// Record a skipped source.
    pub fn add_skipped(&mut self, item: SkippedItem) {
        self.skipped.push(item);
    }

    /// Record a warning.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Sources skipped because they do not exist.
    pub fn missing(&self) -> impl Iterator<Item = &SkippedItem> {
        self.skipped
            .iter()
            .filter(|item| item.reason == SkipReason::Missing)
    }

    /// Sources skipped because copying them failed.
    pub fn failed(&self) -> impl Iterator<Item = &SkippedItem> {
        self.skipped
            .iter()
            .filter(|item| matches!(item.reason, SkipReason::Failed(_)))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "copied={} missing={} failed={} warnings={}",
            self.copied,
            self.missing().count(),
            self.failed().count(),
            self.warnings.len()
        )
    }
}
