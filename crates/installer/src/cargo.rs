use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::{
    CommandRunner, Confirm, Context, InstallFlags, InstallReport, PlannedCommand,
    install::{plan, run_install},
};

/// Installs crates with `cargo install`.
#[derive(Debug)]
pub struct CargoInstaller {
    packages: Vec<String>,
    flags: InstallFlags,
}

impl CargoInstaller {
    /// Create an installer for `packages`.
    pub fn new(packages: Vec<String>, flags: InstallFlags) -> Self {
        Self { packages, flags }
    }

    /// Install each crate that is not already installed.
    pub fn install(
        &self,
        context: &mut Context,
        runner: &mut dyn CommandRunner,
        confirm: &mut dyn Confirm,
    ) -> InstallReport {
        context.installer = Some("cargo");
        context.package = None;

        let mut report = InstallReport::default();

        if self.packages.is_empty() {
            info!("{context}No cargo packages to install");
            return report;
        }

        info!("{context}Found {} cargo packages to install", self.packages.len());

        let installed = match runner.output(&PlannedCommand::new("cargo", &["install", "--list"])) {
            Ok(list) => installed_crates(&list),
            Err(e) => {
                warn!("{context}Could not list installed crates: {e}");
                BTreeSet::new()
            }
        };

        for package in &self.packages {
            context.package = Some(package.clone());

            if installed.contains(package) {
                info!("{context}Already installed, skipping");
                report.skipped.push(package.clone());
                continue;
            }

            let command = PlannedCommand::new("cargo", &["install", package.as_str()]);

            if self.flags.dry_run {
                plan(context, command, &mut report);
                continue;
            }

            if !confirm.confirm(&format!("Install cargo package {package}?")) {
                info!("{context}Declined");
                report.skipped.push(package.clone());
                continue;
            }

            run_install(context, runner, &command, package, &mut report);
        }

        context.package = None;
        report
    }
}

/// The crate names in `cargo install --list` output.
///
/// Crates are listed as `name v1.2.3:` followed by indented binary names.
pub fn installed_crates(list: &str) -> BTreeSet<String> {
    list.lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}
