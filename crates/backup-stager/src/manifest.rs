//! The record of everything staged during a run.
//!

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::{Category, Context};

/// File name of the manifest at the root of the staged tree.
pub const MANIFEST_FILE: &str = "backup_manifest.json";

/// One staged source.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CopyResult {
    /// The resolved source path.
    pub source: PathBuf,

    /// Where the source was copied to inside the staging area. Relative to the staging root once
    /// recorded by a run.
    pub dest: PathBuf,

    /// Lowercase hex SHA-256 of the staged copy, `None` for directories.
    pub hash: Option<String>,

    /// The category the source belongs to. Implied by the manifest key.
    #[serde(skip)]
    pub category: Category,
}

impl CopyResult {
    /// Rewrite `dest` relative to `root`, so it stays meaningful once the staged tree is moved.
    ///
    /// Destinations outside `root` are kept as they are.
    pub fn relative_to(self, root: &Path) -> Self {
        let dest = match self.dest.strip_prefix(root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => self.dest,
        };

        Self { dest, ..self }
    }
}

/// The manifest written as `backup_manifest.json`.
///
/// Serializes as `{"timestamp": "...", "<category>": [{"source", "dest", "hash"}, ...], ...}`
/// with every category present, in processing order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Manifest {
    /// When the run started, RFC 3339.
    pub timestamp: String,

    /// Staged sources per category.
    #[serde(flatten)]
    pub entries: BTreeMap<Category, Vec<CopyResult>>,
}

impl Manifest {
    /// Create an empty manifest with an entry list for each category.
    pub fn new<I>(timestamp: String, categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        Self {
            timestamp,
            entries: categories
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }

    /// Record a staged source under its category.
    ///
    /// A file result for a destination already holding a recorded file replaces the older
    /// result, as the older copy has been overwritten on disk. Returns the replaced result.
    ///
    /// Directories merge into each other on disk, so every directory result is kept.
    pub fn record(&mut self, result: CopyResult) -> Option<CopyResult> {
        let entries = self.entries.entry(result.category).or_default();

        let replaced = if result.hash.is_some() {
            entries
                .iter()
                .position(|entry| entry.dest == result.dest && entry.hash.is_some())
                .map(|position| entries.remove(position))
        } else {
            None
        };

        entries.push(result);
        replaced
    }

    /// The total number of recorded results.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// If no results have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pretty JSON form of the manifest.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Write the manifest as pretty JSON to `path`.
pub fn write_manifest(
    context: &mut Context,
    manifest: &Manifest,
    path: &Path,
) -> Result<(), WriteManifestError> {
    context.current_context = "Write Manifest";

    let result = write_json(manifest, path);

    match &result {
        Ok(()) => info!("{context}Backup manifest written to: {path:?}"),
        Err(e) => error!("{context}Failed to write manifest: {e}"),
    }

    result
}

fn write_json(manifest: &Manifest, path: &Path) -> Result<(), WriteManifestError> {
    let file = File::create(path).map_err(WriteManifestError::Create)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, manifest)?;
    writer.flush().map_err(WriteManifestError::Write)?;

    Ok(())
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum WriteManifestError {
    #[error("Failed to create manifest file:\n{0}")]
    Create(#[source] io::Error),

    #[error("Failed to serialize manifest:\n{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write manifest file:\n{0}")]
    Write(#[source] io::Error),
}
