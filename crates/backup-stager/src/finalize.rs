//! Turning the staged tree into the backup artifact.
//!

use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use flate2::{Compression, write::GzEncoder};
use thiserror::Error;
use tracing::info;
use walkdir::WalkDir;

use crate::{Context, CopyItemError, copy_tree};

/// What the staged tree is finalized into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeMode {
    /// A `<name>_<YYYYMMDD_HHMM>.tar.gz` archive in the output directory.
    Archive,

    /// A `<name>` directory in the output directory.
    Directory,
}

impl FinalizeMode {
    /// Archive only when both `compress` and `output_tarball` are set.
    pub fn from_flags(compress: bool, output_tarball: bool) -> Self {
        if compress && output_tarball {
            Self::Archive
        } else {
            Self::Directory
        }
    }
}

/// The archive file name for a backup started at `started`.
pub fn archive_name(backup_name: &str, started: &DateTime<Local>) -> String {
    format!("{backup_name}_{}.tar.gz", started.format("%Y%m%d_%H%M"))
}

/// Finalize the staged tree at `staging_root` into `output_dir`, returning the artifact's path.
pub fn finalize(
    context: &mut Context,
    staging_root: &Path,
    output_dir: &Path,
    backup_name: &str,
    mode: FinalizeMode,
    started: &DateTime<Local>,
) -> Result<PathBuf, FinalizeError> {
    match mode {
        FinalizeMode::Archive => {
            compress_staging(context, staging_root, output_dir, backup_name, started)
        }
        FinalizeMode::Directory => copy_staging(context, staging_root, output_dir, backup_name),
    }
}

/// Pack the staged tree into a gzip compressed tar archive in `output_dir`.
///
/// The archive is written to a temporary file next to its final path and only renamed into place
/// once complete, so a failure never leaves a truncated archive behind.
pub fn compress_staging(
    context: &mut Context,
    staging_root: &Path,
    output_dir: &Path,
    backup_name: &str,
    started: &DateTime<Local>,
) -> Result<PathBuf, FinalizeError> {
    context.current_context = "Compress";

    let archive_path = output_dir.join(archive_name(backup_name, started));

    let temporary = tempfile::Builder::new()
        .prefix(".")
        .suffix(".partial")
        .tempfile_in(output_dir)
        .map_err(|e| FinalizeError::CreateArchive(e, output_dir.into()))?;

    {
        let encoder = GzEncoder::new(temporary.as_file(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        append_tree(&mut builder, staging_root)?;

        let mut file = builder
            .into_inner()
            .map_err(FinalizeError::FinishArchive)?
            .finish()
            .map_err(FinalizeError::FinishArchive)?;
        file.flush().map_err(FinalizeError::FinishArchive)?;
        file.sync_all().map_err(FinalizeError::FinishArchive)?;
    }

    temporary
        .persist(&archive_path)
        .map_err(|e| FinalizeError::Persist(e.error, archive_path.clone()))?;

    info!("{context}Compressed backup to {archive_path:?}");

    Ok(archive_path)
}

/// Append every entry below `root` to the archive, relative to `root`, in sorted order.
fn append_tree<W: Write>(builder: &mut tar::Builder<W>, root: &Path) -> Result<(), FinalizeError> {
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        let appended = if entry.file_type().is_dir() {
            builder.append_dir(relative, entry.path())
        } else {
            builder.append_path_with_name(entry.path(), relative)
        };

        appended.map_err(|e| FinalizeError::AppendEntry(e, entry.path().into()))?;
    }

    Ok(())
}

/// Copy the staged tree into `output_dir/backup_name`, merging with anything already there.
pub fn copy_staging(
    context: &mut Context,
    staging_root: &Path,
    output_dir: &Path,
    backup_name: &str,
) -> Result<PathBuf, FinalizeError> {
    context.current_context = "Copy Backup";

    let final_backup = output_dir.join(backup_name);
    copy_tree(context, staging_root, &final_backup)?;

    info!("{context}Backup copied to {final_backup:?}");

    Ok(final_backup)
}

/// Open a finished archive for reading.
pub fn open_archive(path: &Path) -> io::Result<tar::Archive<flate2::read::GzDecoder<File>>> {
    let file = File::open(path)?;
    Ok(tar::Archive::new(flate2::read::GzDecoder::new(file)))
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("Failed to create archive in {1:?}:\n{0}")]
    CreateArchive(#[source] io::Error, PathBuf),

    #[error("Failed to walk staging area:\n{0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to append {1:?} to archive:\n{0}")]
    AppendEntry(#[source] io::Error, PathBuf),

    #[error("Failed to finish archive:\n{0}")]
    FinishArchive(#[source] io::Error),

    #[error("Failed to move archive to {1:?}:\n{0}")]
    Persist(#[source] io::Error, PathBuf),

    #[error("Failed to copy staging area:\n{0}")]
    CopyTree(#[from] CopyItemError),
}
