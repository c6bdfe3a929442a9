use std::path::PathBuf;

use thiserror::Error;

/// If `command` is the first argument after the program name.
pub fn is_command<S: AsRef<str>>(args: &[S], command: &str) -> bool {
    args.get(1).is_some_and(|arg| arg.as_ref() == command)
}

/// The value of `--config`, or `default` if the option is absent.
pub fn config_path<S: AsRef<str>>(args: &[S], default: &str) -> Result<PathBuf, ArgsError> {
    let Some(position) = args.iter().position(|arg| arg.as_ref() == "--config") else {
        return Ok(PathBuf::from(default));
    };

    let Some(value) = args.get(position + 1) else {
        return Err(ArgsError::MissingValue("--config"));
    };
    let value: &str = value.as_ref();

    if value.starts_with("--") {
        return Err(ArgsError::MissingValue("--config"));
    }

    Ok(PathBuf::from(value))
}

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
}
