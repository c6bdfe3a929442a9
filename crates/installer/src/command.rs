//! External commands and how they are run.
//!

use core::fmt;
use std::{
    io,
    process::{Command, Stdio},
};

/// A command the installer wants to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    /// The program to run.
    pub program: String,
    /// Its arguments.
    pub args: Vec<String>,
}

impl PlannedCommand {
    /// Create a command from a program and arguments.
    pub fn new<S: AsRef<str>>(program: &str, args: &[S]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.as_ref().to_string()).collect(),
        }
    }

    /// A command run by the platform's shell.
    pub fn shell(command: &str) -> Self {
        if cfg!(windows) {
            Self::new("cmd", &["/C", command])
        } else {
            Self::new("sh", &["-c", command])
        }
    }

    /// Prefix the command with `sudo` if `sudo` is set.
    pub fn with_sudo(self, sudo: bool) -> Self {
        if !sudo {
            return self;
        }

        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);

        Self {
            program: "sudo".to_string(),
            args,
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

impl fmt::Display for PlannedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs external commands.
pub trait CommandRunner {
    /// Run a command to completion, returning if it exited successfully.
    fn run(&mut self, command: &PlannedCommand) -> io::Result<bool>;

    /// Run a command to completion and capture its stdout.
    fn output(&mut self, command: &PlannedCommand) -> io::Result<String>;
}

/// Runs commands as child processes.
#[derive(Debug, Default)]
pub struct SystemRunner {
    /// Discard the output of commands.
    pub quiet: bool,
}

impl SystemRunner {
    fn command(command: &PlannedCommand) -> Command {
        let mut process = Command::new(&command.program);
        process.args(&command.args);
        process
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &PlannedCommand) -> io::Result<bool> {
        let mut process = Self::command(command);

        if self.quiet {
            process.stdout(Stdio::null()).stderr(Stdio::null());
        }

        Ok(process.status()?.success())
    }

    fn output(&mut self, command: &PlannedCommand) -> io::Result<String> {
        let output = Self::command(command).stderr(Stdio::null()).output()?;

        if !output.status.success() {
            return Err(io::Error::other(format!("{command} exited with {}", output.status)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
