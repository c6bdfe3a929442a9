//! Tests for copying single sources
//!

use std::fs;

use backup_stager::{Category, Context, CopyOutcome, copy_item, hash_file};
use common::Fixture;
use shared::test::write_file;

mod common;

#[test]
fn file_is_copied_and_hashed() {
    let fixture = Fixture::new();
    let destination = tempfile::tempdir().unwrap();
    let mut context = Context::default();

    let outcome = copy_item(
        &mut context,
        &fixture.source(".bashrc"),
        destination.path(),
        Category::Dotfiles,
    );

    let result = match outcome {
        CopyOutcome::Copied(result) => result,
        other => panic!("expected a copy, got {other:?}"),
    };
    assert_eq!(result.dest, destination.path().join(".bashrc"));
    assert_eq!(result.category, Category::Dotfiles);
    assert_eq!(result.hash.unwrap(), hash_file(&result.source).unwrap());
}

#[test]
fn modification_time_is_kept() {
    let fixture = Fixture::new();
    let source = fixture.home().join(".gitconfig");
    let old = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&source, old).unwrap();

    let destination = tempfile::tempdir().unwrap();
    let mut context = Context::default();
    copy_item(
        &mut context,
        &fixture.source(".gitconfig"),
        destination.path(),
        Category::Dotfiles,
    )
    .into_result()
    .unwrap();

    let metadata = fs::metadata(destination.path().join(".gitconfig")).unwrap();
    assert_eq!(filetime::FileTime::from_last_modification_time(&metadata), old);
}

#[test]
fn directory_merges_into_existing_destination() {
    let fixture = Fixture::new();
    let destination = tempfile::tempdir().unwrap();
    let existing = destination.path().join("nvim").join("after.lua");
    write_file(&existing, "keep").unwrap();
    let mut context = Context::default();

    let result = copy_item(
        &mut context,
        &fixture.source(".config/nvim"),
        destination.path(),
        Category::Configs,
    )
    .into_result()
    .unwrap();

    assert!(result.hash.is_none());
    assert_eq!(fs::read_to_string(existing).unwrap(), "keep");
    assert!(
        destination
            .path()
            .join("nvim")
            .join("lua")
            .join("plugins.lua")
            .is_file()
    );
}

#[test]
fn missing_source_is_not_an_error() {
    let fixture = Fixture::new();
    let destination = tempfile::tempdir().unwrap();
    let mut context = Context::default();

    let outcome = copy_item(
        &mut context,
        &fixture.source(".mozilla/firefox"),
        destination.path(),
        Category::BrowserData,
    );

    assert!(matches!(outcome, CopyOutcome::Missing(_)));
    assert_eq!(fs::read_dir(destination.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn failed_directory_leaves_no_partial_copy() {
    let fixture = Fixture::new();
    std::os::unix::fs::symlink(
        fixture.home().join("nowhere"),
        fixture.home().join(".ssh").join("broken"),
    )
    .unwrap();
    let destination = tempfile::tempdir().unwrap();
    let mut context = Context::default();

    let outcome = copy_item(
        &mut context,
        &fixture.source(".ssh"),
        destination.path(),
        Category::Credentials,
    );

    assert!(matches!(outcome, CopyOutcome::Failed(..)));
    assert!(!destination.path().join(".ssh").exists());
}
