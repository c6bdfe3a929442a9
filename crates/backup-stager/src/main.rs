//! # Backup stager
//! Backs up this machine's configured targets into a directory or archive.
//!

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::{fs, path::PathBuf, process::ExitCode};

use backup_stager::{BackupRequest, BackupRun, Config, Context};
use mimalloc::MiMalloc;

use shared::{Failure, config_path, init_logger, is_command, level_from_args};
use tracing::{error, info, warn};

const DEFAULT_CONFIG: &str = "./backup.toml";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let _logger = init_logger(&PathBuf::from("./logs"), level_from_args(&args))
        .or_log_and_panic("Could not initialize logger");

    let config_path = config_path(&args, DEFAULT_CONFIG).or_log_and_panic("Invalid arguments");

    // Initialize config if the command is 'init'.
    if is_command(&args, "init") {
        let config = Config::default();
        let contents = toml::to_string_pretty(&config).or_log_and_panic("Could not serialize config");
        fs::write(&config_path, contents).or_log_and_panic("Could not write config");
        info!("Wrote default config to {config_path:?}");
        return ExitCode::SUCCESS;
    }

    // Load config
    let config = Config::load_toml(config_path).or_log_and_panic("Could not load config");

    let request = match BackupRequest::from_config(&config) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid backup config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut context = Context::for_backup(request.backup_name());
    let mut run = BackupRun::new(request);

    match run.run(&mut context) {
        Ok(backup) => {
            for item in &backup.report.skipped {
                warn!("Skipped {} {:?}: {:?}", item.category, item.raw, item.reason);
            }

            println!("{}", backup.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Backup failed: {e}");
            ExitCode::FAILURE
        }
    }
}
