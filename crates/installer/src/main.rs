//! # Installer
//! Installs the packages listed in `install.toml`.
//!

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::{fs, path::PathBuf, process::ExitCode};

use installer::{
    AlwaysConfirm, Config, Confirm, Context, StdinConfirm, SystemRunner, install_all,
};
use mimalloc::MiMalloc;

use shared::{Failure, config_path, init_logger, is_command, level_from_args};
use tracing::info;

const DEFAULT_CONFIG: &str = "./install.toml";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let _logger = init_logger(&PathBuf::from("./logs"), level_from_args(&args))
        .or_log_and_panic("Could not initialize logger");

    let config_path = config_path(&args, DEFAULT_CONFIG).or_log_and_panic("Invalid arguments");

    // Initialize config if the command is 'init'.
    if is_command(&args, "init") {
        let contents =
            toml::to_string_pretty(&Config::example()).or_log_and_panic("Could not serialize config");
        fs::write(&config_path, contents).or_log_and_panic("Could not write config");
        info!("Wrote example config to {config_path:?}");
        return ExitCode::SUCCESS;
    }

    // Load config
    let mut config = Config::load_toml(config_path).or_log_and_panic("Could not load config");

    if args.iter().any(|arg| arg.eq("--dry-run")) {
        config.flags.dry_run = true;
    }
    if args.iter().any(|arg| arg.eq("--quiet")) {
        config.flags.quiet = true;
    }

    let mut confirm: Box<dyn Confirm> =
        if config.flags.interactive && !args.iter().any(|arg| arg.eq("--yes")) {
            Box::new(StdinConfirm)
        } else {
            Box::new(AlwaysConfirm)
        };
    let mut runner = SystemRunner {
        quiet: config.flags.quiet,
    };
    let mut context = Context::default();

    let report = install_all(&mut context, &config, &mut runner, confirm.as_mut());

    for command in &report.planned {
        println!("{command}");
    }

    if report.failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
