//! Tests for whole backup runs
//!

use std::{fs, path::PathBuf};

use backup_stager::{
    BackupFlags, BackupRun, Category, Context, FinalizeError, RunError, RunState, hash_file,
};
use shared::test::write_file;

use common::{
    Fixture, archive_entries, archive_flags, category_entries, directory_flags, read_manifest,
    unpack, without_timestamp,
};

mod common;

#[test]
fn archive_scenario() {
    let fixture = Fixture::new();
    let request = fixture.request(
        &[(Category::Dotfiles, &[".bashrc"]), (Category::Configs, &[])],
        archive_flags(),
    );
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();

    let file_name = backup.path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(backup.path.parent().unwrap(), fixture.output());
    assert!(file_name.starts_with("host1_"));
    assert!(file_name.ends_with(".tar.gz"));

    let entries = archive_entries(&backup.path);
    assert!(entries.contains(&"dotfiles/.bashrc".into()));
    assert!(entries.contains(&"backup_manifest.json".into()));
    for category in Category::ALL {
        assert!(entries.contains(&category.as_str().into()));
    }

    let unpacked = unpack(&backup.path);
    let manifest = read_manifest(unpacked.path());
    let dotfiles = category_entries(&manifest, Category::Dotfiles);
    assert_eq!(dotfiles.len(), 1);
    assert_eq!(dotfiles[0]["source"], fixture.resolved(".bashrc"));
    assert_eq!(dotfiles[0]["dest"], "dotfiles/.bashrc");
    for category in Category::ALL.into_iter().filter(|c| *c != Category::Dotfiles) {
        assert!(category_entries(&manifest, category).is_empty());
    }

    // Only the archive is in the output directory.
    assert_eq!(fs::read_dir(fixture.output()).unwrap().count(), 1);
    assert!(fixture.staging_is_empty());
}

#[test]
fn directory_scenario() {
    let fixture = Fixture::new();
    let request = fixture.request(
        &[(Category::Dotfiles, &[".bashrc"]), (Category::Configs, &[])],
        directory_flags(),
    );
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();

    assert_eq!(backup.path, fixture.output().join("host1"));
    assert_eq!(
        fs::read_to_string(backup.path.join("dotfiles").join(".bashrc")).unwrap(),
        "alias ll='ls -l'\n"
    );
    for category in Category::ALL {
        assert!(backup.path.join(category.as_str()).is_dir());
    }

    let manifest = read_manifest(&backup.path);
    assert_eq!(category_entries(&manifest, Category::Dotfiles).len(), 1);

    let archives = fs::read_dir(fixture.output())
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".tar.gz")
        })
        .count();
    assert_eq!(archives, 0);
    assert!(fixture.staging_is_empty());
}

#[test]
fn manifest_counts_existing_sources() {
    let fixture = Fixture::new();
    let request = fixture.request(
        &[
            (Category::Dotfiles, &[".bashrc", ".zshrc", ".gitconfig"]),
            (Category::Credentials, &[".ssh", ".gnupg"]),
            (Category::Configs, &[".config/nvim"]),
            (Category::BrowserData, &[".mozilla/firefox"]),
        ],
        directory_flags(),
    );
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();

    assert_eq!(backup.manifest.len(), 4);
    assert_eq!(backup.report.copied, 4);
    assert_eq!(backup.report.missing().count(), 3);
    assert_eq!(backup.report.failed().count(), 0);

    let manifest = read_manifest(&backup.path);
    let total: usize = Category::ALL
        .into_iter()
        .map(|category| category_entries(&manifest, category).len())
        .sum();
    assert_eq!(total, 4);

    let missing: Vec<String> = backup
        .report
        .missing()
        .map(|item| item.raw.clone())
        .collect();
    assert!(missing.contains(&fixture.source(".zshrc")));
    assert!(missing.contains(&fixture.source(".gnupg")));
    assert!(missing.contains(&fixture.source(".mozilla/firefox")));
}

#[test]
fn recorded_hashes_match_backup() {
    let fixture = Fixture::new();
    let request = fixture.request(
        &[
            (Category::Dotfiles, &[".bashrc", ".gitconfig"]),
            (Category::Configs, &[".config/nvim"]),
        ],
        archive_flags(),
    );
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();
    let unpacked = unpack(&backup.path);
    let manifest = read_manifest(unpacked.path());

    for entry in category_entries(&manifest, Category::Dotfiles) {
        let dest = unpacked.path().join(entry["dest"].as_str().unwrap());
        assert_eq!(entry["hash"].as_str().unwrap(), hash_file(&dest).unwrap());
    }

    let configs = category_entries(&manifest, Category::Configs);
    assert_eq!(configs.len(), 1);
    assert!(configs[0]["hash"].is_null());
    assert!(
        unpacked
            .path()
            .join("configs")
            .join("nvim")
            .join("lua")
            .join("plugins.lua")
            .is_file()
    );
}

#[test]
fn repeated_runs_are_identical_except_timestamp() {
    let fixture = Fixture::new();
    let targets: &[(Category, &[&str])] = &[
        (Category::Dotfiles, &[".bashrc", ".gitconfig"]),
        (Category::Credentials, &[".ssh"]),
        (Category::Configs, &[".config/nvim", ".config/missing"]),
    ];

    let mut manifests = Vec::new();
    for _ in 0..2 {
        let mut context = Context::for_backup("host1");
        let backup = BackupRun::new(fixture.request(targets, directory_flags()))
            .run(&mut context)
            .unwrap();

        manifests.push(without_timestamp(read_manifest(&backup.path)));
        fs::remove_dir_all(&backup.path).unwrap();
    }

    assert_eq!(manifests[0], manifests[1]);
    assert!(fixture.staging_is_empty());
}

#[cfg(unix)]
#[test]
fn failing_source_is_skipped_and_cleaned() {
    let fixture = Fixture::new();
    let broken = fixture.home().join(".ssh").join("broken");
    std::os::unix::fs::symlink(fixture.home().join("nowhere"), &broken).unwrap();

    let request = fixture.request(
        &[
            (Category::Credentials, &[".ssh"]),
            (Category::Dotfiles, &[".bashrc"]),
        ],
        directory_flags(),
    );
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();

    assert_eq!(backup.report.failed().count(), 1);
    assert_eq!(backup.report.copied, 1);
    assert!(category_entries(&read_manifest(&backup.path), Category::Credentials).is_empty());
    assert!(!backup.path.join("credentials").join(".ssh").exists());
    assert!(backup.path.join("dotfiles").join(".bashrc").is_file());
    assert!(fixture.staging_is_empty());
}

#[test]
fn finalize_failure_fails_run_and_cleans_staging() {
    let fixture = Fixture::new();
    fs::write(fixture.output().join("host1"), "not a directory").unwrap();

    let request = fixture.request(&[(Category::Dotfiles, &[".bashrc"])], directory_flags());
    let mut context = Context::for_backup("host1");
    let mut run = BackupRun::new(request);

    let result = run.run(&mut context);

    assert!(matches!(
        result,
        Err(RunError::Finalize(FinalizeError::CopyTree(_)))
    ));
    assert_eq!(run.state(), RunState::Failed);
    assert!(fixture.staging_is_empty());
}

#[test]
fn staging_failure_fails_run() {
    let fixture = Fixture::new();
    let blocked = fixture.root.path().join("blocked");
    fs::write(&blocked, "").unwrap();

    let request = fixture
        .request(&[(Category::Dotfiles, &[".bashrc"])], archive_flags())
        .with_staging_parent(blocked.join("staging"));
    let mut context = Context::for_backup("host1");
    let mut run = BackupRun::new(request);

    assert!(matches!(run.run(&mut context), Err(RunError::Staging(_))));
    assert_eq!(run.state(), RunState::Failed);
    assert_eq!(fs::read_dir(fixture.output()).unwrap().count(), 0);
}

#[test]
fn encryption_flag_still_writes_plain_archive() {
    let fixture = Fixture::new();
    let flags = BackupFlags {
        encrypt_backup: true,
        include_private_keys: true,
        ..archive_flags()
    };
    let request = fixture.request(&[(Category::Dotfiles, &[".bashrc"])], flags);
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();

    assert!(archive_entries(&backup.path).contains(&"dotfiles/.bashrc".into()));
}

#[test]
fn same_file_destination_keeps_latest_copy() {
    let fixture = Fixture::new();
    common::write_other_bashrc(&fixture);

    let request = fixture.request(
        &[(Category::Dotfiles, &[".bashrc", "other/.bashrc"])],
        directory_flags(),
    );
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();

    assert_eq!(backup.manifest.len(), 1);
    assert_eq!(backup.report.warnings.len(), 1);
    let dotfiles = category_entries(&read_manifest(&backup.path), Category::Dotfiles).clone();
    assert_eq!(dotfiles[0]["source"], fixture.resolved("other/.bashrc"));
    assert_eq!(
        fs::read_to_string(backup.path.join("dotfiles").join(".bashrc")).unwrap(),
        "other\n"
    );
}

#[test]
fn same_named_directories_are_both_recorded() {
    let fixture = Fixture::new();
    write_file(&fixture.home().join("a").join("nvim").join("one.lua"), "one\n").unwrap();
    write_file(&fixture.home().join("b").join("nvim").join("two.lua"), "two\n").unwrap();

    let request = fixture.request(&[(Category::Configs, &["a/nvim", "b/nvim"])], directory_flags());
    let mut context = Context::for_backup("host1");

    let backup = BackupRun::new(request).run(&mut context).unwrap();

    assert_eq!(backup.manifest.len(), 2);
    assert_eq!(backup.report.copied, 2);
    assert!(backup.report.warnings.is_empty());

    let configs = category_entries(&read_manifest(&backup.path), Category::Configs).clone();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0]["source"], fixture.resolved("a/nvim"));
    assert_eq!(configs[1]["source"], fixture.resolved("b/nvim"));

    let nvim = backup.path.join("configs").join("nvim");
    assert!(nvim.join("one.lua").is_file());
    assert!(nvim.join("two.lua").is_file());
}

#[test]
fn manifest_failure_still_finalizes() {
    let fixture = Fixture::new();
    let request = fixture.request(&[(Category::Dotfiles, &[".bashrc"])], directory_flags());
    let mut context = Context::for_backup("host1");

    // A category directory already exists where the manifest would be created.
    let mut run = BackupRun::new(request).with_manifest_file(PathBuf::from("dotfiles"));
    let backup = run.run(&mut context).unwrap();

    assert_eq!(run.state(), RunState::Finalized);
    assert_eq!(backup.report.warnings.len(), 1);
    assert!(backup.report.warnings[0].contains("manifest"));
    assert_eq!(backup.manifest.len(), 1);
    assert!(backup.path.join("dotfiles").join(".bashrc").is_file());
    assert!(!backup.path.join("backup_manifest.json").exists());
    assert!(fixture.staging_is_empty());
}
