use std::collections::BTreeMap;

use tracing::info;

use crate::{
    CommandRunner, Confirm, Context, InstallFlags, InstallReport, PlannedCommand, Script,
    install::{plan, run_install},
};

/// Runs named install scripts through the shell.
#[derive(Debug)]
pub struct ScriptInstaller {
    scripts: BTreeMap<String, Script>,
    flags: InstallFlags,
}

impl ScriptInstaller {
    /// Create an installer for `scripts`.
    pub fn new(scripts: BTreeMap<String, Script>, flags: InstallFlags) -> Self {
        Self { scripts, flags }
    }

    /// Run every script that has a command, in name order.
    pub fn install(
        &self,
        context: &mut Context,
        runner: &mut dyn CommandRunner,
        confirm: &mut dyn Confirm,
    ) -> InstallReport {
        context.installer = Some("script");
        context.package = None;

        let mut report = InstallReport::default();

        if self.scripts.is_empty() {
            info!("{context}No scripts found");
            return report;
        }

        for (name, script) in &self.scripts {
            context.package = Some(name.clone());

            let Some(command) = runnable_command(script) else {
                info!("{context}Skipping, no install command");
                report.skipped.push(name.clone());
                continue;
            };
            let command = PlannedCommand::shell(command);

            if self.flags.dry_run {
                plan(context, command, &mut report);
                continue;
            }

            if !confirm.confirm(&format!("Run install for {name} ({})?", script.description)) {
                info!("{context}Declined");
                report.skipped.push(name.clone());
                continue;
            }

            run_install(context, runner, &command, name, &mut report);
        }

        context.package = None;
        report
    }
}

/// The script's command, unless it is missing, blank or marked `# TODO`.
fn runnable_command(script: &Script) -> Option<&str> {
    script
        .install
        .as_deref()
        .map(str::trim)
        .filter(|command| !command.is_empty())
        .filter(|command| !command.to_lowercase().contains("# todo"))
}
