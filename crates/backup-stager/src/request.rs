use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;

use crate::{BackupFlags, Category, Config, FinalizeMode, PlatformConfig, resolve};

/// Everything needed for one backup run. Validated on construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRequest {
    backup_name: String,
    output_dir: PathBuf,
    target_groups: BTreeMap<Category, Vec<String>>,
    flags: BackupFlags,
    staging_parent: Option<PathBuf>,
}

impl BackupRequest {
    /// Create a request, validating the name and output directory.
    ///
    /// Every category is present in the request, categories missing from `target_groups` have
    /// no paths.
    pub fn new(
        backup_name: &str,
        output_dir: PathBuf,
        mut target_groups: BTreeMap<Category, Vec<String>>,
        flags: BackupFlags,
    ) -> Result<Self, RequestError> {
        validate_backup_name(backup_name)?;

        if !output_dir.is_absolute() {
            return Err(RequestError::RelativeOutputDir(output_dir));
        }

        for category in Category::ALL {
            target_groups.entry(category).or_default();
        }

        Ok(Self {
            backup_name: backup_name.to_string(),
            output_dir,
            target_groups,
            flags,
            staging_parent: None,
        })
    }

    /// Create a request from one platform's config, resolving its output directory.
    pub fn from_platform(platform: &PlatformConfig) -> Result<Self, RequestError> {
        if platform.output_dir.trim().is_empty() {
            return Err(RequestError::EmptyOutputDir);
        }

        Self::new(
            &platform.backup_name,
            resolve(&platform.output_dir),
            platform.targets.clone(),
            platform.flags,
        )
    }

    /// Create a request for the current platform's section of `config`.
    pub fn from_config(config: &Config) -> Result<Self, RequestError> {
        let platform = config
            .for_current_platform()
            .ok_or_else(|| RequestError::NoPlatform(std::env::consts::OS.to_string()))?;

        let request = Self::from_platform(platform)?;

        Ok(match &config.staging_parent {
            Some(parent) => request.with_staging_parent(parent.clone()),
            None => request,
        })
    }

    /// Create staging areas inside `parent` instead of the system temp directory.
    pub fn with_staging_parent(self, parent: PathBuf) -> Self {
        Self {
            staging_parent: Some(parent),
            ..self
        }
    }

    /// The backup's name.
    pub fn backup_name(&self) -> &str {
        &self.backup_name
    }

    /// The absolute directory the backup is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The raw paths for every category, in processing order.
    pub fn target_groups(&self) -> &BTreeMap<Category, Vec<String>> {
        &self.target_groups
    }

    /// The output flags.
    pub fn flags(&self) -> BackupFlags {
        self.flags
    }

    /// Where staging areas are created, if not the system temp directory.
    pub fn staging_parent(&self) -> Option<&Path> {
        self.staging_parent.as_deref()
    }

    /// How the staged tree will be finalized.
    pub fn mode(&self) -> FinalizeMode {
        FinalizeMode::from_flags(self.flags.compress, self.flags.output_tarball)
    }

    /// The number of configured source paths across every category.
    pub fn source_count(&self) -> usize {
        self.target_groups.values().map(Vec::len).sum()
    }
}

fn validate_backup_name(backup_name: &str) -> Result<(), RequestError> {
    if backup_name.trim().is_empty() {
        return Err(RequestError::EmptyBackupName);
    }

    let mut components = Path::new(backup_name).components();
    let is_single_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == backup_name
    );

    if !is_single_name {
        return Err(RequestError::InvalidBackupName(backup_name.to_string()));
    }

    Ok(())
}

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("No backup settings for platform '{0}'")]
    NoPlatform(String),

    #[error("The backup name is empty")]
    EmptyBackupName,

    #[error("The backup name '{0}' must be a single file name")]
    InvalidBackupName(String),

    #[error("The output directory is empty")]
    EmptyOutputDir,

    #[error("The output directory {0:?} is not absolute")]
    RelativeOutputDir(PathBuf),
}
