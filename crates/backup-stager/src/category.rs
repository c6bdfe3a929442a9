use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A named group of backup targets sharing one staging subdirectory.
///
/// The declaration order is the order categories are processed and written in.
#[derive(Hash, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Browser profiles, bookmarks and extensions.
    BrowserData,

    /// SSH keys, GPG keyrings, credential stores.
    Credentials,

    /// Files such as `~/.bashrc`.
    Dotfiles,

    /// Application config directories.
    Configs,

    /// System files such as `/etc/fstab`.
    Sysfiles,

    /// Whole user directories.
    UsrDirs,
}

impl Category {
    /// Every category, in processing order.
    pub const ALL: [Self; 6] = [
        Self::BrowserData,
        Self::Credentials,
        Self::Dotfiles,
        Self::Configs,
        Self::Sysfiles,
        Self::UsrDirs,
    ];

    /// The category's name, also used as its staging directory name and manifest key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrowserData => "browser_data",
            Self::Credentials => "credentials",
            Self::Dotfiles => "dotfiles",
            Self::Configs => "configs",
            Self::Sysfiles => "sysfiles",
            Self::UsrDirs => "usr_dirs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("invalid category '{s}'"))
    }
}
