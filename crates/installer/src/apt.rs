use tracing::{debug, info, warn};

use crate::{
    CommandRunner, Confirm, Context, InstallError, InstallFlags, InstallReport, PlannedCommand,
    install::{plan, run_install},
};

/// Installs packages with `apt`.
#[derive(Debug)]
pub struct AptInstaller {
    packages: Vec<String>,
    flags: InstallFlags,
}

impl AptInstaller {
    /// Create an installer for `packages`.
    pub fn new(packages: Vec<String>, flags: InstallFlags) -> Self {
        Self { packages, flags }
    }

    /// `apt update`
    pub fn update_command(&self) -> PlannedCommand {
        PlannedCommand::new("apt", &["update"]).with_sudo(self.flags.allow_sudo)
    }

    /// `apt install --simulate -y <package>`
    pub fn simulate_command(&self, package: &str) -> PlannedCommand {
        PlannedCommand::new("apt", &["install", "--simulate", "-y", package])
            .with_sudo(self.flags.allow_sudo)
    }

    /// `apt install -y <package>`, with `-qq` when quiet.
    pub fn install_command(&self, package: &str) -> PlannedCommand {
        let command = PlannedCommand::new("apt", &["install", "-y", package]);
        let command = if self.flags.quiet {
            command.arg("-qq")
        } else {
            command
        };

        command.with_sudo(self.flags.allow_sudo)
    }

    /// Update the package lists then install each package.
    ///
    /// Fails only if the package lists could not be updated. Packages that fail simulation or
    /// installation are recorded as failed.
    pub fn install(
        &self,
        context: &mut Context,
        runner: &mut dyn CommandRunner,
        confirm: &mut dyn Confirm,
    ) -> Result<InstallReport, InstallError> {
        context.installer = Some("apt");
        context.package = None;

        let mut report = InstallReport::default();

        if self.packages.is_empty() {
            info!("{context}No apt packages to install");
            return Ok(report);
        }

        info!("{context}Found {} apt packages to install", self.packages.len());

        if self.flags.dry_run {
            plan(context, self.update_command(), &mut report);
            for package in &self.packages {
                plan(context, self.install_command(package), &mut report);
            }
            return Ok(report);
        }

        if !self.flags.allow_sudo {
            warn!("{context}allow_sudo is off, apt will likely need root");
        }

        let update = self.update_command();
        info!("{context}Updating apt repositories");
        match runner.run(&update) {
            Ok(true) => {}
            Ok(false) => return Err(InstallError::Unsuccessful(update.to_string())),
            Err(e) => return Err(InstallError::Spawn(e, update.to_string())),
        }

        for package in &self.packages {
            context.package = Some(package.clone());

            if self.flags.simulate_before_apt {
                debug!("{context}Simulating install");
                if !runner.run(&self.simulate_command(package)).unwrap_or(false) {
                    warn!("{context}Simulation failed, skipping install");
                    report.failed.push(package.clone());
                    continue;
                }
            }

            if !confirm.confirm(&format!("Install {package}?")) {
                info!("{context}Declined");
                report.skipped.push(package.clone());
                continue;
            }

            run_install(
                context,
                runner,
                &self.install_command(package),
                package,
                &mut report,
            );
        }

        context.package = None;
        Ok(report)
    }
}
