//! Backup stager config
//!

use std::{collections::BTreeMap, env, fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Category;

/// The backup stager's config.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Where staging areas are created. The system temp directory if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_parent: Option<PathBuf>,

    /// Per platform backup settings, keyed by platform name (`linux`, `windows`, `macos`).
    pub platform: BTreeMap<String, PlatformConfig>,
}

/// The backup settings for one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Name of the output directory or archive prefix.
    pub backup_name: String,

    /// Where the finished backup is written. `~` and environment variables are expanded.
    pub output_dir: String,

    /// Output flags.
    #[serde(default)]
    pub flags: BackupFlags,

    /// The paths to back up for each category.
    #[serde(default)]
    pub targets: BTreeMap<Category, Vec<String>>,
}

/// Flags controlling the backup output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackupFlags {
    /// Compress the backup. Only takes effect with `output_tarball`.
    pub compress: bool,

    /// Write the backup as a `.tar.gz`. Only takes effect with `compress`.
    pub output_tarball: bool,

    /// Accepted but not implemented, backups are always written unencrypted.
    pub encrypt_backup: bool,

    /// Accepted but not implemented, has no effect on what is copied.
    pub include_private_keys: bool,
}

impl Config {
    /// Tries to load a config from a toml file.
    pub fn load_toml(file_path: PathBuf) -> Result<Self, LoadConfigError> {
        if !file_path.exists() {
            return Err(LoadConfigError::NoFile);
        }

        let contents = fs::read_to_string(file_path).map_err(LoadConfigError::Read)?;
        let config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// The settings for the platform this program was compiled for.
    pub fn for_current_platform(&self) -> Option<&PlatformConfig> {
        self.platform.get(env::consts::OS)
    }
}

impl Default for Config {
    fn default() -> Self {
        let linux = PlatformConfig {
            backup_name: "linux_backup".to_string(),
            output_dir: "~/backups".to_string(),
            flags: BackupFlags {
                compress: true,
                output_tarball: true,
                ..BackupFlags::default()
            },
            targets: targets(&[
                (Category::BrowserData, &["~/.mozilla/firefox"]),
                (Category::Credentials, &["~/.ssh", "~/.gnupg"]),
                (Category::Dotfiles, &["~/.bashrc", "~/.profile", "~/.gitconfig"]),
                (Category::Configs, &["~/.config/nvim"]),
                (Category::Sysfiles, &["/etc/fstab", "/etc/hosts"]),
                (Category::UsrDirs, &["~/Documents"]),
            ]),
        };

        let windows = PlatformConfig {
            backup_name: "windows_backup".to_string(),
            output_dir: "~/backups".to_string(),
            flags: BackupFlags {
                compress: true,
                output_tarball: true,
                ..BackupFlags::default()
            },
            targets: targets(&[
                (
                    Category::BrowserData,
                    &["%APPDATA%\\Mozilla\\Firefox\\Profiles"],
                ),
                (Category::Credentials, &["~/.ssh"]),
                (Category::Dotfiles, &["~/.gitconfig"]),
                (Category::Configs, &["%APPDATA%\\Code\\User\\settings.json"]),
                (
                    Category::Sysfiles,
                    &["C:\\Windows\\System32\\drivers\\etc\\hosts"],
                ),
                (Category::UsrDirs, &["~/Documents"]),
            ]),
        };

        Self {
            staging_parent: None,
            platform: BTreeMap::from([
                ("linux".to_string(), linux),
                ("windows".to_string(), windows),
            ]),
        }
    }
}

fn targets(groups: &[(Category, &[&str])]) -> BTreeMap<Category, Vec<String>> {
    groups
        .iter()
        .map(|(category, paths)| (*category, paths.iter().map(|p| p.to_string()).collect()))
        .collect()
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("The file does not exist.")]
    NoFile,

    #[error("Failed to read the file:\n{0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    Deserialize(#[from] toml::de::Error),
}
