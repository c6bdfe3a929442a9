//! # Shared
//! The shared components between the backup stager and the installer.
//!

#![warn(missing_docs)]

mod args;
mod failure;
mod logger;

pub use args::{ArgsError, config_path, is_command};
pub use failure::Failure;
pub use logger::{LoggerError, init_logger, level_from_args};
