//! Driving a backup request from staging to the finished artifact.
//!

use std::{fs, io, path::PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    BackupRequest, Context, CopyOutcome, FinalizeError, MANIFEST_FILE, Manifest, RunReport, SkipReason,
    SkippedItem, StagingArea, StagingError, copy_item, finalize, write_manifest,
};

/// Where a backup run is in its lifecycle. Runs only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Created, not yet started.
    Init,
    /// Creating the staging area.
    Staging,
    /// Copying sources into the staging area.
    Copying,
    /// The manifest has been handled, the run is finalizing.
    ManifestWritten,
    /// The backup artifact exists.
    Finalized,
    /// The run hit a fatal error.
    Failed,
}

/// The result of a successful run.
#[derive(Debug)]
pub struct Backup {
    /// Absolute path of the archive or directory.
    pub path: PathBuf,
    /// What was copied and skipped.
    pub report: RunReport,
    /// The manifest written into the backup.
    pub manifest: Manifest,
}

/// A single backup run over one request.
#[derive(Debug)]
pub struct BackupRun {
    request: BackupRequest,
    state: RunState,
    manifest_file: PathBuf,
}

impl BackupRun {
    /// Create a run for `request`.
    pub fn new(request: BackupRequest) -> Self {
        Self {
            request,
            state: RunState::Init,
            manifest_file: PathBuf::from(MANIFEST_FILE),
        }
    }

    /// Write the manifest to `manifest_file`, relative to the root of the backup, instead of
    /// [`MANIFEST_FILE`].
    pub fn with_manifest_file(self, manifest_file: PathBuf) -> Self {
        Self {
            manifest_file,
            ..self
        }
    }

    /// The request being run.
    pub fn request(&self) -> &BackupRequest {
        &self.request
    }

    /// The current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Stage every configured source, write the manifest and finalize the backup.
    ///
    /// Missing or failing sources are skipped and reported. Only failing to create the staging
    /// area or destination, or failing to finalize, fails the run. The staging area is removed
    /// on every exit path.
    pub fn run(&mut self, context: &mut Context) -> Result<Backup, RunError> {
        if self.state != RunState::Init {
            return Err(RunError::AlreadyRun(self.state));
        }

        let result = self.execute(context);

        if let Err(e) = &result {
            self.state = RunState::Failed;
            warn!("{context}Backup failed: {e}");
        }

        result
    }

    fn execute(&mut self, context: &mut Context) -> Result<Backup, RunError> {
        context.current_context = "Init";

        let started = Local::now();
        let flags = self.request.flags();

        if flags.encrypt_backup {
            warn!("{context}Encryption is not supported, the backup will be written unencrypted");
        }
        if flags.include_private_keys {
            debug!("{context}include_private_keys is set, it has no effect");
        }

        let output_dir = self.request.output_dir();
        fs::create_dir_all(output_dir)
            .map_err(|e| RunError::CreateDestination(e, output_dir.into()))?;

        self.state = RunState::Staging;
        let staging = StagingArea::create(
            context,
            self.request.staging_parent(),
            self.request.target_groups().keys().copied(),
        )?;

        self.state = RunState::Copying;
        let mut report = RunReport::default();
        let mut manifest = Manifest::new(started.to_rfc3339(), staging.categories().keys().copied());

        for (&category, raw_paths) in self.request.target_groups() {
            let Some(directory) = staging.category_directory(category) else {
                continue;
            };
            context.category = Some(category);

            for raw in raw_paths {
                let skipped = |source, reason| SkippedItem {
                    category,
                    raw: raw.clone(),
                    source,
                    reason,
                };

                match copy_item(context, raw, directory, category) {
                    CopyOutcome::Copied(result) => {
                        let result = result.relative_to(staging.root());

                        match manifest.record(result) {
                            Some(replaced) => {
                                let warning = format!(
                                    "{:?} overwrote the staged copy of {:?}",
                                    raw, replaced.source
                                );
                                warn!("{context}{warning}");
                                report.add_warning(warning);
                            }
                            None => report.add_copied(),
                        }
                    }
                    CopyOutcome::Missing(source) => {
                        report.add_skipped(skipped(source, SkipReason::Missing));
                    }
                    CopyOutcome::Failed(source, e) => {
                        report.add_skipped(skipped(source, SkipReason::Failed(e.to_string())));
                    }
                }
            }
        }
        context.category = None;

        let manifest_path = staging.root().join(&self.manifest_file);
        if let Err(e) = write_manifest(context, &manifest, &manifest_path) {
            report.add_warning(format!("The manifest was not written: {e}"));
        }
        self.state = RunState::ManifestWritten;

        let finalized = finalize(
            context,
            staging.root(),
            output_dir,
            self.request.backup_name(),
            self.request.mode(),
            &started,
        );
        staging.remove(context);
        let path = finalized?;

        self.state = RunState::Finalized;
        info!("{context}Backup finished at {path:?}: {report}");

        Ok(Backup {
            path,
            report,
            manifest,
        })
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum RunError {
    #[error("The run has already been started, it is {0:?}")]
    AlreadyRun(RunState),

    #[error("Failed to create the output directory {1:?}:\n{0}")]
    CreateDestination(#[source] io::Error, PathBuf),

    #[error("Failed to create the staging area:\n{0}")]
    Staging(#[from] StagingError),

    #[error("Failed to finalize the backup:\n{0}")]
    Finalize(#[from] FinalizeError),
}
