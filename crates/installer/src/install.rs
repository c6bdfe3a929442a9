//! Running every installer over a config.
//!

use std::io;

use thiserror::Error;
use tracing::{error, info};

use crate::{
    AptInstaller, CargoInstaller, CommandRunner, Config, Confirm, Context, InstallReport,
    PlannedCommand, ScriptInstaller,
};

/// Run the apt, cargo and script installers in turn.
///
/// An installer that cannot start marks its packages as failed, the remaining installers still
/// run.
pub fn install_all(
    context: &mut Context,
    config: &Config,
    runner: &mut dyn CommandRunner,
    confirm: &mut dyn Confirm,
) -> InstallReport {
    context.dry_run = config.flags.dry_run;

    let mut report = InstallReport::default();

    let apt = AptInstaller::new(config.packages.apt.clone(), config.flags);
    match apt.install(context, runner, confirm) {
        Ok(apt_report) => report.merge(apt_report),
        Err(e) => {
            error!("{context}Could not install apt packages: {e}");
            report.failed.extend(config.packages.apt.iter().cloned());
        }
    }

    let cargo = CargoInstaller::new(config.packages.cargo.clone(), config.flags);
    report.merge(cargo.install(context, runner, confirm));

    let scripts = ScriptInstaller::new(config.scripts.clone(), config.flags);
    report.merge(scripts.install(context, runner, confirm));

    context.installer = None;
    context.package = None;
    info!("{context}Finished installing: {report}");

    report
}

/// Run one package's install command, recording the outcome in `report`.
pub(crate) fn run_install(
    context: &Context,
    runner: &mut dyn CommandRunner,
    command: &PlannedCommand,
    name: &str,
    report: &mut InstallReport,
) {
    info!("{context}Installing {name}");

    match runner.run(command) {
        Ok(true) => {
            info!("{context}Installed {name}");
            report.installed.push(name.to_string());
        }
        Ok(false) => {
            error!("{context}Failed to install {name}: `{command}` was unsuccessful");
            report.failed.push(name.to_string());
        }
        Err(e) => {
            error!("{context}Failed to run `{command}`: {e}");
            report.failed.push(name.to_string());
        }
    }
}

/// Record a command a dry run would have run.
pub(crate) fn plan(context: &Context, command: PlannedCommand, report: &mut InstallReport) {
    info!("{context}Would run: {command}");
    report.planned.push(command);
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to run `{1}`:\n{0}")]
    Spawn(#[source] io::Error, String),

    #[error("`{0}` was unsuccessful")]
    Unsuccessful(String),
}
