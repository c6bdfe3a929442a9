//! # common
//!

#![allow(dead_code)]

use std::{collections::BTreeSet, io};

use installer::{CommandRunner, InstallFlags, PlannedCommand};

/// Records every command and fails those mentioning a failing package.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub commands: Vec<String>,
    pub failing: BTreeSet<String>,
    pub unavailable: BTreeSet<String>,
    pub cargo_list: String,
}

impl RecordingRunner {
    pub fn failing(packages: &[&str]) -> Self {
        Self {
            failing: packages.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &PlannedCommand) -> io::Result<bool> {
        self.commands.push(command.to_string());

        if command.args.iter().any(|arg| self.unavailable.contains(arg)) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
        }

        Ok(!command.args.iter().any(|arg| self.failing.contains(arg)))
    }

    fn output(&mut self, command: &PlannedCommand) -> io::Result<String> {
        self.commands.push(command.to_string());
        Ok(self.cargo_list.clone())
    }
}

/// Non interactive flags with sudo and simulation.
pub fn flags() -> InstallFlags {
    InstallFlags {
        interactive: false,
        ..InstallFlags::default()
    }
}

pub fn packages(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
