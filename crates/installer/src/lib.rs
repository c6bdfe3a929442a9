//! # installer
//! Installs a machine's packages through apt, cargo and shell scripts.
//!

mod apt;
mod cargo;
mod command;
mod config;
mod confirm;
mod context;
mod install;
mod report;
mod script;

pub use apt::AptInstaller;
pub use cargo::{CargoInstaller, installed_crates};
pub use command::{CommandRunner, PlannedCommand, SystemRunner};
pub use config::{Config, InstallFlags, LoadConfigError, Packages, Script};
pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm, StdinConfirm, ask, is_yes};
pub use context::Context;
pub use install::{InstallError, install_all};
pub use report::InstallReport;
pub use script::ScriptInstaller;
