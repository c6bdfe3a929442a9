//! # backup-stager
//! Stages a machine's configuration surface into a temporary tree, hashes and records every
//! staged file, then finalizes the tree as a directory or a `.tar.gz` archive.
//!

mod category;
mod config;
mod context;
mod copier;
mod finalize;
mod hash;
mod manifest;
mod report;
mod request;
mod resolve;
mod run;
mod staging;

pub use category::Category;
pub use config::{BackupFlags, Config, LoadConfigError, PlatformConfig};
pub use context::Context;
pub use copier::{CopyItemError, CopyOutcome, copy_file_with_metadata, copy_item, copy_tree};
pub use finalize::{
    FinalizeError, FinalizeMode, archive_name, compress_staging, copy_staging, finalize,
    open_archive,
};
pub use hash::{CHUNK_BYTES, HashError, hash_file, hash_file_with};
pub use manifest::{CopyResult, MANIFEST_FILE, Manifest, WriteManifestError, write_manifest};
pub use report::{RunReport, SkipReason, SkippedItem};
pub use request::{BackupRequest, RequestError};
pub use resolve::{expand, expand_dollar_variables, expand_home, expand_percent_variables, resolve};
pub use run::{Backup, BackupRun, RunError, RunState};
pub use staging::{StagingArea, StagingError, create_category_directories};
