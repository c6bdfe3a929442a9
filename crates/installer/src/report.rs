//! What an install did.

use core::fmt;

use crate::PlannedCommand;

/// The outcome of installing a set of packages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Packages that were installed.
    pub installed: Vec<String>,
    /// Packages that were already installed, declined or have nothing to run.
    pub skipped: Vec<String>,
    /// Packages that failed to install.
    pub failed: Vec<String>,
    /// Commands a dry run would have run.
    pub planned: Vec<PlannedCommand>,
}

impl InstallReport {
    /// Add another report's packages to this one.
    pub fn merge(&mut self, other: Self) {
        self.installed.extend(other.installed);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
        self.planned.extend(other.planned);
    }
}

impl fmt::Display for InstallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "installed={} skipped={} failed={} planned={}",
            self.installed.len(),
            self.skipped.len(),
            self.failed.len(),
            self.planned.len()
        )
    }
}
