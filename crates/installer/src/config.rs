//! Installer config
//!

use std::{collections::BTreeMap, fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The installer's config.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Behaviour flags.
    #[serde(default)]
    pub flags: InstallFlags,

    /// Packages installed through package managers.
    #[serde(default)]
    pub packages: Packages,

    /// Named install scripts.
    #[serde(default)]
    pub scripts: BTreeMap<String, Script>,
}

/// Flags controlling how packages are installed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallFlags {
    /// Log what would be installed without installing anything.
    pub dry_run: bool,

    /// Suppress package manager output.
    pub quiet: bool,

    /// Ask before installing each package.
    pub interactive: bool,

    /// Prefix apt commands with `sudo`.
    pub allow_sudo: bool,

    /// Only install an apt package if `apt install --simulate` succeeds.
    pub simulate_before_apt: bool,
}

impl Default for InstallFlags {
    fn default() -> Self {
        Self {
            dry_run: false,
            quiet: false,
            interactive: true,
            allow_sudo: true,
            simulate_before_apt: true,
        }
    }
}

/// Packages per package manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Packages {
    /// Packages installed with `apt install`.
    pub apt: Vec<String>,

    /// Crates installed with `cargo install`.
    pub cargo: Vec<String>,
}

/// A shell command that installs something no package manager provides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// The shell command. Skipped if missing or marked `# TODO`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<String>,

    /// Shown when asking to run the script.
    #[serde(default)]
    pub description: String,
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

    /// A starter config with a few common packages.
    pub fn example() -> Self {
        Self {
            flags: InstallFlags::default(),
            packages: Packages {
                apt: vec!["git".to_string(), "curl".to_string()],
                cargo: vec!["ripgrep".to_string()],
            },
            scripts: BTreeMap::from([(
                "rustup".to_string(),
                Script {
                    install: Some(
                        "curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y"
                            .to_string(),
                    ),
                    description: "Rust toolchain installer".to_string(),
                },
            )]),
        }
    }
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
