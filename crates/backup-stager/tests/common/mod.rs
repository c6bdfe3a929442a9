//! # common
//!

#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use backup_stager::{BackupFlags, BackupRequest, Category, open_archive, resolve};
use serde_json::Value;
use shared::test::{init_test_logger, write_file};
use tempfile::TempDir;

/// A source tree, output directory and staging parent inside one temporary directory.
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        init_test_logger();

        let root = tempfile::tempdir().unwrap();
        let fixture = Self { root };

        let home = fixture.home();
        write_file(&home.join(".bashrc"), "alias ll='ls -l'\n").unwrap();
        write_file(&home.join(".gitconfig"), "[user]\n\tname = test\n").unwrap();
        write_file(&home.join(".ssh").join("config"), "Host *\n").unwrap();
        write_file(&home.join(".ssh").join("known_hosts"), "github.com ssh-ed25519 AAAA\n")
            .unwrap();
        write_file(
            &home.join(".config").join("nvim").join("init.lua"),
            "vim.o.number = true\n",
        )
        .unwrap();
        write_file(
            &home.join(".config").join("nvim").join("lua").join("plugins.lua"),
            "return {}\n",
        )
        .unwrap();

        fs::create_dir_all(fixture.output()).unwrap();
        fs::create_dir_all(fixture.staging_parent()).unwrap();

        fixture
    }

    /// The fake home directory sources live in.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Where backups are written.
    pub fn output(&self) -> PathBuf {
        self.root.path().join("backups")
    }

    /// Where staging areas are created.
    pub fn staging_parent(&self) -> PathBuf {
        self.root.path().join("staging")
    }

    /// The raw config string for a path inside the fake home.
    pub fn source(&self, relative: &str) -> String {
        self.home().join(relative).to_string_lossy().into_owned()
    }

    /// The resolved form of a path inside the fake home, as recorded in manifests.
    pub fn resolved(&self, relative: &str) -> String {
        resolve(&self.source(relative)).to_string_lossy().into_owned()
    }

    /// A request for `host1` with the given home relative sources.
    pub fn request(&self, targets: &[(Category, &[&str])], flags: BackupFlags) -> BackupRequest {
        let targets: BTreeMap<Category, Vec<String>> = targets
            .iter()
            .map(|(category, paths)| {
                let paths = paths.iter().map(|path| self.source(path)).collect();
                (*category, paths)
            })
            .collect();

        BackupRequest::new("host1", self.output(), targets, flags)
            .unwrap()
            .with_staging_parent(self.staging_parent())
    }

    /// If every staging area has been removed.
    pub fn staging_is_empty(&self) -> bool {
        fs::read_dir(self.staging_parent()).unwrap().next().is_none()
    }
}

pub fn archive_flags() -> BackupFlags {
    BackupFlags {
        compress: true,
        output_tarball: true,
        ..BackupFlags::default()
    }
}

pub fn directory_flags() -> BackupFlags {
    BackupFlags::default()
}

/// Every entry path in an archive, sorted.
pub fn archive_entries(path: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = open_archive(path)
        .unwrap()
        .entries()
        .unwrap()
        .map(|entry| entry.unwrap().path().unwrap().into_owned())
        .collect();
    entries.sort();
    entries
}

/// Unpack an archive into a new temporary directory.
pub fn unpack(path: &Path) -> TempDir {
    let directory = tempfile::tempdir().unwrap();
    open_archive(path).unwrap().unpack(directory.path()).unwrap();
    directory
}

/// Parse the manifest at the root of a backup directory.
pub fn read_manifest(backup: &Path) -> Value {
    let contents = fs::read_to_string(backup.join("backup_manifest.json")).unwrap();
    serde_json::from_str(&contents).unwrap()
}

/// The manifest entries for one category.
pub fn category_entries<'a>(manifest: &'a Value, category: Category) -> &'a Vec<Value> {
    manifest[category.as_str()].as_array().unwrap()
}

/// The manifest with its timestamp removed.
pub fn without_timestamp(mut manifest: Value) -> Value {
    manifest.as_object_mut().unwrap().remove("timestamp");
    manifest
}

/// A second `.bashrc` that stages to the same destination as the first.
pub fn write_other_bashrc(fixture: &Fixture) {
    write_file(&fixture.home().join("other").join(".bashrc"), "other\n").unwrap();
}
