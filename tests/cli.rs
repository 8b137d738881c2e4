use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn prdrsnap() -> Command {
    Command::cargo_bin("prdrsnap").expect("binary builds")
}

fn write_profile(dir: &Path, name: &str, inner: &[u8]) {
    let mut bytes = vec![0x00, 0x10];
    bytes.extend_from_slice(&[0xFF, 0xD8]);
    bytes.extend_from_slice(inner);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes.push(0x20);
    fs::write(dir.join(name), bytes).expect("write profile file");
}

#[test]
fn help_shows_usage() {
    prdrsnap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PRDR"))
        .stdout(predicate::str::contains("--source"))
        .stdout(predicate::str::contains("--dest"));
}

#[test]
fn generate_config_writes_sample() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("sample.toml");

    prdrsnap()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[directories]"));
    assert!(content.contains("[conversion]"));
}

#[test]
fn list_enumerates_profile_files() {
    let source = TempDir::new().unwrap();
    write_profile(source.path(), "PRDR3001", &[0xAA]);
    write_profile(source.path(), "PRDR3002", &[0xBB]);
    fs::write(source.path().join("other.dat"), b"ignored").unwrap();

    prdrsnap()
        .arg("--list")
        .arg("--source")
        .arg(source.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PRDR3001"))
        .stdout(predicate::str::contains("PRDR3002"))
        .stdout(predicate::str::contains("2 file(s)"))
        .stdout(predicate::str::contains("other.dat").not());
}

#[test]
fn list_empty_directory_fails() {
    let source = TempDir::new().unwrap();

    prdrsnap()
        .arg("--list")
        .arg("--source")
        .arg(source.path())
        .assert()
        .failure()
        .code(6);
}

#[test]
fn extracts_images_end_to_end() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    write_profile(source.path(), "PRDR3001", &[0xAA, 0xBB]);
    write_profile(source.path(), "PRDR3002", &[0xCC]);

    prdrsnap()
        .current_dir(workdir.path())
        .arg("--source")
        .arg(source.path())
        .arg("--dest")
        .arg(dest.path())
        .arg("--no-decode-check")
        .assert()
        .success();

    let first = fs::read(dest.path().join("PRDR3001.jpg")).unwrap();
    assert_eq!(first, vec![0xFF, 0xD8, 0xAA, 0xBB, 0xFF, 0xD9]);
    assert!(dest.path().join("PRDR3002.jpg").exists());

    // Directories are persisted for the next run.
    let saved = fs::read_to_string(workdir.path().join("prdrsnap.toml")).unwrap();
    assert!(saved.contains("source_dir"));
    assert!(saved.contains("destination_dir"));
}

#[test]
fn pick_converts_subset_only() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    write_profile(source.path(), "PRDR3001", &[0x01]);
    write_profile(source.path(), "PRDR3002", &[0x02]);
    write_profile(source.path(), "PRDR3003", &[0x03]);

    prdrsnap()
        .current_dir(workdir.path())
        .arg("--source")
        .arg(source.path())
        .arg("--dest")
        .arg(dest.path())
        .arg("--pick")
        .arg("1,3")
        .arg("--no-decode-check")
        .assert()
        .success();

    assert!(dest.path().join("PRDR3001.jpg").exists());
    assert!(!dest.path().join("PRDR3002.jpg").exists());
    assert!(dest.path().join("PRDR3003.jpg").exists());
}

#[test]
fn copy_mode_preserves_filenames() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    write_profile(source.path(), "PRDR3001", &[0x01]);

    prdrsnap()
        .current_dir(workdir.path())
        .arg("--source")
        .arg(source.path())
        .arg("--dest")
        .arg(dest.path())
        .arg("--copy")
        .assert()
        .success();

    assert!(dest.path().join("PRDR3001").exists());
    assert!(!dest.path().join("PRDR3001.jpg").exists());

    // Raw copy is byte-identical to the source.
    let original = fs::read(source.path().join("PRDR3001")).unwrap();
    let copied = fs::read(dest.path().join("PRDR3001")).unwrap();
    assert_eq!(original, copied);
}

#[test]
fn dry_run_writes_nothing() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    write_profile(source.path(), "PRDR3001", &[0x01]);

    prdrsnap()
        .current_dir(workdir.path())
        .arg("--source")
        .arg(source.path())
        .arg("--dest")
        .arg(dest.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("PRDR3001"));

    assert!(!dest.path().join("PRDR3001.jpg").exists());
    assert!(!workdir.path().join("prdrsnap.toml").exists());
}

#[test]
fn missing_destination_is_a_config_error() {
    let source = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    write_profile(source.path(), "PRDR3001", &[0x01]);

    prdrsnap()
        .current_dir(workdir.path())
        .arg("--source")
        .arg(source.path())
        .assert()
        .failure()
        .code(3);
}

#[test]
fn files_without_images_are_skipped_not_fatal() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    write_profile(source.path(), "PRDR3001", &[0x01]);
    fs::write(source.path().join("PRDR3002"), b"no markers at all").unwrap();

    prdrsnap()
        .current_dir(workdir.path())
        .arg("--source")
        .arg(source.path())
        .arg("--dest")
        .arg(dest.path())
        .arg("--no-decode-check")
        .assert()
        .success();

    assert!(dest.path().join("PRDR3001.jpg").exists());
    assert!(!dest.path().join("PRDR3002.jpg").exists());
}
