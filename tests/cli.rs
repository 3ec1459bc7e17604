use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

use passvault::models::{Account, AccountGroup, AppData};

fn passvault(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("passvault").unwrap();
    cmd.env_remove("PASSVAULT_PASSPHRASE")
        .env_remove("PASSVAULT_NEW_PASSPHRASE")
        .env_remove("PASSVAULT_LOG")
        .arg("--data-dir")
        .arg(dir);
    cmd
}

fn write_sample(path: &Path) {
    let mut group = AccountGroup::new("Email");
    group.add_account(Account::new("Fastmail", "me@example.com", "s3cr3t-pw"));
    let mut data = AppData::default();
    data.groups.push(group);
    std::fs::write(path, serde_json::to_string_pretty(&data).unwrap()).unwrap();
}

fn encrypted_store(passphrase: &str) -> TempDir {
    let dir = tempdir().unwrap();
    write_sample(&dir.path().join("accounts.json"));
    passvault(dir.path())
        .args(["encrypt", "enable", "--new-passphrase", passphrase])
        .assert()
        .success();
    dir
}

#[test]
fn status_on_fresh_directory() {
    let dir = tempdir().unwrap();
    passvault(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encryption:  Disabled"))
        .stdout(predicate::str::contains("0 groups, 0 accounts"));
}

#[test]
fn list_never_prints_passwords() {
    let dir = tempdir().unwrap();
    write_sample(&dir.path().join("accounts.json"));

    passvault(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fastmail"))
        .stdout(predicate::str::contains("s3cr3t-pw").not());
}

#[test]
fn enable_encryption_then_unlock() {
    let dir = encrypted_store("secret1");

    let raw = std::fs::read_to_string(dir.path().join("accounts.json")).unwrap();
    assert!(raw.contains("\"data\""));
    assert!(!raw.contains("Fastmail"));

    passvault(dir.path())
        .args(["--passphrase", "secret1", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Encryption:  Enabled"))
        .stdout(predicate::str::contains("1 groups, 1 accounts"));
}

#[test]
fn wrong_passphrase_is_denied() {
    let dir = encrypted_store("secret1");

    passvault(dir.path())
        .args(["--passphrase", "not-it", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"));
}

#[test]
fn short_passphrase_is_rejected() {
    let dir = tempdir().unwrap();
    passvault(dir.path())
        .args(["encrypt", "enable", "--new-passphrase", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 6 characters"));
}

#[test]
fn disable_encryption_restores_plaintext() {
    let dir = encrypted_store("secret1");

    passvault(dir.path())
        .args(["--passphrase", "secret1", "encrypt", "disable", "--yes"])
        .assert()
        .success();

    let raw = std::fs::read_to_string(dir.path().join("accounts.json")).unwrap();
    assert!(raw.contains("Fastmail"));
}

#[test]
fn import_then_export() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("incoming.json");
    write_sample(&source);

    passvault(dir.path())
        .arg("import")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 groups and 1 accounts"));

    let exported = dir.path().join("backup.json");
    passvault(dir.path())
        .arg("export")
        .arg(&exported)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&exported).unwrap();
    assert!(raw.contains("Fastmail"));
}

#[test]
fn decrypt_writes_plaintext() {
    let dir = encrypted_store("secret1");
    let output = dir.path().join("plain.json");

    passvault(dir.path())
        .arg("decrypt")
        .arg(dir.path().join("accounts.json"))
        .arg("--output")
        .arg(&output)
        .args(["--passphrase", "secret1"])
        .assert()
        .success();

    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.contains("Fastmail"));
}

#[test]
fn custom_path_set_and_reset() {
    let dir = tempdir().unwrap();
    let custom = dir.path().join("synced").join("vault.json");

    passvault(dir.path())
        .args(["path", "set"])
        .arg(&custom)
        .assert()
        .success();

    passvault(dir.path())
        .args(["path", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vault.json"));

    passvault(dir.path())
        .args(["path", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("accounts.json"));
}

#[test]
fn path_reset_repairs_corrupt_settings() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    passvault(dir.path())
        .args(["path", "reset"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Settings file could not be read"));

    let repaired = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());

    passvault(dir.path())
        .arg("status")
        .assert()
        .success()
        .stderr(predicate::str::contains("Settings file").not());
}
