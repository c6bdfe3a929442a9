use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{Category, Context};

const STAGING_PREFIX: &str = "backup-stager-";

/// Create `parent` and one subdirectory per category inside it.
///
/// Existing directories are reused.
pub fn create_category_directories<I>(
    parent: &Path,
    categories: I,
) -> Result<BTreeMap<Category, PathBuf>, StagingError>
where
    I: IntoIterator<Item = Category>,
{
    fs::create_dir_all(parent).map_err(|e| StagingError::CreateDirectory(e, parent.into()))?;

    categories
        .into_iter()
        .map(|category| {
            let directory = parent.join(category.as_str());
            fs::create_dir_all(&directory)
                .map_err(|e| StagingError::CreateDirectory(e, directory.clone()))?;

            Ok((category, directory))
        })
        .collect()
}

/// An exclusively owned, temporary directory tree the backup is assembled in.
///
/// The tree is deleted when the staging area is dropped.
#[derive(Debug)]
pub struct StagingArea {
    directory: TempDir,
    categories: BTreeMap<Category, PathBuf>,
}

impl StagingArea {
    /// Create a new staging area inside `parent`, or the system temp directory if `None`.
    pub fn create<I>(
        context: &mut Context,
        parent: Option<&Path>,
        categories: I,
    ) -> Result<Self, StagingError>
    where
        I: IntoIterator<Item = Category>,
    {
        context.current_context = "Staging";

        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);

        let directory = match parent {
            Some(parent) => {
                fs::create_dir_all(parent)
                    .map_err(|e| StagingError::CreateDirectory(e, parent.into()))?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        }
        .map_err(StagingError::CreateTemporary)?;

        debug!("{context}Created staging area {:?}", directory.path());

        let categories = create_category_directories(directory.path(), categories)?;

        Ok(Self {
            directory,
            categories,
        })
    }

    /// The root of the staged tree.
    pub fn root(&self) -> &Path {
        self.directory.path()
    }

    /// The staging directory for a category, if the category was staged.
    pub fn category_directory(&self, category: Category) -> Option<&Path> {
        self.categories.get(&category).map(PathBuf::as_path)
    }

    /// Every staged category and its directory, in processing order.
    pub fn categories(&self) -> &BTreeMap<Category, PathBuf> {
        &self.categories
    }

    /// Delete the staged tree, logging if it could not be removed.
    pub fn remove(self, context: &mut Context) {
        context.current_context = "Cleanup";

        let path = self.directory.path().to_path_buf();
        match self.directory.close() {
            Ok(()) => debug!("{context}Removed staging area {path:?}"),
            Err(error) => warn!("{context}Could not remove staging area {path:?}: {error}"),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to create directory {1:?}:\n{0}")]
    CreateDirectory(#[source] io::Error, PathBuf),

    #[error("Failed to create temporary staging directory:\n{0}")]
    CreateTemporary(#[source] io::Error),
}
