//! Copying a single configured source into the staging area.
//!

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use filetime::{FileTime, set_file_times};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::{Category, Context, CopyResult, HashError, hash_file, resolve};

/// The outcome of copying one source.
#[derive(Debug)]
pub enum CopyOutcome {
    /// The source was staged.
    Copied(CopyResult),

    /// The source does not exist.
    Missing(PathBuf),

    /// The source exists but could not be staged.
    Failed(PathBuf, CopyItemError),
}

impl CopyOutcome {
    /// The copy result, if the source was staged.
    pub fn into_result(self) -> Option<CopyResult> {
        match self {
            Self::Copied(result) => Some(result),
            Self::Missing(_) | Self::Failed(..) => None,
        }
    }
}

/// Resolve `raw` and copy it into `destination_directory`.
///
/// Directories are copied recursively to `destination_directory/<name>`, merging into anything
/// already there. Files are copied with their permissions and timestamps, then the copy is hashed.
///
/// A missing source is logged as a warning, a failed copy as an error. Neither is propagated; if
/// the failed copy created a new destination, that destination is removed again.
pub fn copy_item(
    context: &mut Context,
    raw: &str,
    destination_directory: &Path,
    category: Category,
) -> CopyOutcome {
    context.current_context = "Copy";

    let source = resolve(raw);

    if !source.exists() {
        warn!("{context}{category} not found: {source:?}");
        return CopyOutcome::Missing(source);
    }

    let Some(name) = source.file_name() else {
        error!("{context}Failed to copy {category}: {source:?} has no file name");
        return CopyOutcome::Failed(source.clone(), CopyItemError::NoFileName(source));
    };
    let destination = destination_directory.join(name);
    let destination_existed = destination.exists();

    let copied = copy_to(context, &source, &destination).and_then(|()| {
        let hash = if destination.is_file() {
            Some(hash_file(&destination)?)
        } else {
            None
        };

        Ok(CopyResult {
            source: source.clone(),
            dest: destination.clone(),
            hash,
            category,
        })
    });

    match copied {
        Ok(result) => {
            info!("{context}Copied {category}: {source:?} -> {destination:?}");
            CopyOutcome::Copied(result)
        }
        Err(copy_error) => {
            error!("{context}Failed to copy {category}: {source:?} - {copy_error}");

            if !destination_existed {
                remove_partial(context, &destination);
            }

            CopyOutcome::Failed(source, copy_error)
        }
    }
}

fn copy_to(context: &mut Context, source: &Path, destination: &Path) -> Result<(), CopyItemError> {
    let metadata = fs::metadata(source).map_err(|e| CopyItemError::Metadata(e, source.into()))?;

    if metadata.is_dir() {
        copy_tree(context, source, destination)
    } else {
        copy_file_with_metadata(source, destination)
    }
}

/// Recursively copy `source` into `destination`, merging with existing directories.
///
/// Symbolic links are followed and their targets copied. Entries that are neither files nor
/// directories, such as sockets, are skipped.
pub fn copy_tree(
    context: &mut Context,
    source: &Path,
    destination: &Path,
) -> Result<(), CopyItemError> {
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| CopyItemError::OutsideRoot(entry.path().into()))?;
        let target = destination.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| CopyItemError::CreateDirectory(e, target))?;
        } else if file_type.is_file() {
            copy_file_with_metadata(entry.path(), &target)?;
        } else {
            debug!("{context}Skipping special file {:?}", entry.path());
        }
    }

    Ok(())
}

/// Copy a file then carry over its access and modification times.
///
/// Missing parent directories of `destination` are created.
pub fn copy_file_with_metadata(source: &Path, destination: &Path) -> Result<(), CopyItemError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyItemError::CreateDirectory(e, parent.into()))?;
    }

    fs::copy(source, destination).map_err(|e| CopyItemError::CopyFile(e, source.into()))?;

    let metadata = fs::metadata(source).map_err(|e| CopyItemError::Metadata(e, source.into()))?;
    let accessed = FileTime::from_last_access_time(&metadata);
    let modified = FileTime::from_last_modification_time(&metadata);
    set_file_times(destination, accessed, modified)
        .map_err(|e| CopyItemError::SetTimes(e, destination.into()))?;

    Ok(())
}

fn remove_partial(context: &mut Context, destination: &Path) {
    let removed = match fs::symlink_metadata(destination) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(destination),
        Ok(_) => fs::remove_file(destination),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return,
        Err(error) => Err(error),
    };

    if let Err(error) = removed {
        warn!("{context}Could not remove partial copy {destination:?}: {error}");
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CopyItemError {
    #[error("Path {0:?} has no file name")]
    NoFileName(PathBuf),

    #[error("Failed to read metadata for {1:?}:\n{0}")]
    Metadata(#[source] io::Error, PathBuf),

    #[error("Failed to walk directory:\n{0}")]
    Walk(#[from] walkdir::Error),

    #[error("Walked path {0:?} is outside the source directory")]
    OutsideRoot(PathBuf),

    #[error("Failed to create directory {1:?}:\n{0}")]
    CreateDirectory(#[source] io::Error, PathBuf),

    #[error("Failed to copy file {1:?}:\n{0}")]
    CopyFile(#[source] io::Error, PathBuf),

    #[error("Failed to set file times on {1:?}:\n{0}")]
    SetTimes(#[source] io::Error, PathBuf),

    #[error("Failed to hash the copy:\n{0}")]
    Hash(#[from] HashError),
}
