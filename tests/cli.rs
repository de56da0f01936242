//! Integration tests for the faqstore binary

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn faqstore(temp_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("faqstore");
    cmd.env("FAQSTORE_DATA_DIR", temp_dir.path())
        .env_remove("FAQSTORE_ENV")
        .env("FAQSTORE_LOG", "off");
    cmd
}

fn create_entry(temp_dir: &TempDir, env: &str, question: &str) -> String {
    let output = faqstore(temp_dir)
        .args(["faq", "--env", env, "create", "-q", question, "-a", "An answer"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("ID: "))
        .map(str::to_string)
        .unwrap()
}

fn backup_names(temp_dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(temp_dir.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_init_writes_settings() {
    let temp_dir = TempDir::new().unwrap();

    faqstore(&temp_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Environments: stunting and ppid"));

    assert!(temp_dir.path().join("config.json").exists());
    assert!(temp_dir.path().join("data").is_dir());
}

#[test]
fn test_config_shows_paths() {
    let temp_dir = TempDir::new().unwrap();

    faqstore(&temp_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Retention:      30 day(s)"))
        .stdout(predicate::str::contains(
            temp_dir.path().join("backups").display().to_string(),
        ));
}

#[test]
fn test_create_list_show_delete() {
    let temp_dir = TempDir::new().unwrap();
    let id = create_entry(&temp_dir, "stunting", "Apa itu stunting?");

    faqstore(&temp_dir)
        .args(["faq", "--env", "stunting", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Apa itu stunting?"))
        .stdout(predicate::str::contains("Total: 1 entry"));

    faqstore(&temp_dir)
        .args(["faq", "--env", "stunting", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("An answer"));

    faqstore(&temp_dir)
        .args(["faq", "--env", "stunting", "delete", &id])
        .assert()
        .success();

    faqstore(&temp_dir)
        .args(["faq", "--env", "stunting", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));

    assert_eq!(backup_names(&temp_dir).len(), 2);
}

#[test]
fn test_edit_updates_answer() {
    let temp_dir = TempDir::new().unwrap();
    let id = create_entry(&temp_dir, "ppid", "Apa itu PPID?");

    faqstore(&temp_dir)
        .args(["faq", "--env", "ppid", "edit", &id, "--answer", "Pejabat informasi"])
        .assert()
        .success();

    faqstore(&temp_dir)
        .args(["faq", "--env", "ppid", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pejabat informasi"))
        .stdout(predicate::str::contains("Apa itu PPID?"));
}

#[test]
fn test_unknown_environment_fails() {
    let temp_dir = TempDir::new().unwrap();

    faqstore(&temp_dir)
        .args(["faq", "--env", "staging", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_missing_entry_fails() {
    let temp_dir = TempDir::new().unwrap();

    faqstore(&temp_dir)
        .args(["faq", "--env", "ppid", "delete", "does-not-exist"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("backups").exists() || backup_names(&temp_dir).is_empty());
}

#[test]
fn test_backup_list_and_restore_latest() {
    let temp_dir = TempDir::new().unwrap();
    create_entry(&temp_dir, "stunting", "First?");
    create_entry(&temp_dir, "stunting", "Second?");

    faqstore(&temp_dir)
        .args(["backup", "list", "--env", "stunting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2 backup(s)"));

    // Without --force nothing changes
    faqstore(&temp_dir)
        .args(["backup", "restore", "latest", "--env", "stunting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(backup_names(&temp_dir).len(), 2);

    faqstore(&temp_dir)
        .args(["backup", "restore", "latest", "--env", "stunting", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete!"));

    faqstore(&temp_dir)
        .args(["faq", "--env", "stunting", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First?"))
        .stdout(predicate::str::contains("Second?").not());

    assert_eq!(backup_names(&temp_dir).len(), 3);
}

#[test]
fn test_cross_environment_restore_fails() {
    let temp_dir = TempDir::new().unwrap();
    create_entry(&temp_dir, "stunting", "Stunting?");
    let artifact = backup_names(&temp_dir).remove(0);

    faqstore(&temp_dir)
        .args(["backup", "restore", &artifact, "--env", "ppid", "--force"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("data").join("faq_ppid.json").exists());
}

#[test]
fn test_prune_requires_force() {
    let temp_dir = TempDir::new().unwrap();
    create_entry(&temp_dir, "ppid", "One?");
    create_entry(&temp_dir, "ppid", "Two?");

    faqstore(&temp_dir)
        .args(["backup", "prune", "--days", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(backup_names(&temp_dir).len(), 2);

    faqstore(&temp_dir)
        .args(["backup", "prune", "--days", "0", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 backup(s)."));
    assert_eq!(backup_names(&temp_dir).len(), 1);
}
