use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `jpid` with its config directory pointed into `home`.
fn jpid(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jpid").unwrap();
    cmd.env("XDG_CONFIG_HOME", home)
        .env("HOME", home)
        .env_remove("REQUEST_TIMEOUT_SECS");
    cmd
}

#[test]
fn test_types_lists_builtin_documents() {
    let home = TempDir::new().unwrap();
    jpid(home.path())
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("drivers_license_jp"))
        .stdout(predicate::str::contains("individual_number_card_jp"))
        .stdout(predicate::str::contains("2 types"));
}

#[test]
fn test_replay_flat_text() {
    let home = TempDir::new().unwrap();
    let text = home.path().join("card.txt");
    fs::write(&text, "氏名 山田 花子\n住所 大阪府大阪市\n個人番号 123456789012\n").unwrap();

    jpid(home.path())
        .args(["replay", "--document-type", "individual_number_card_jp", "--text"])
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"individual_number\": \"1234-5678-9012\""))
        .stdout(predicate::str::contains("\"name\": \"山田 花子\""));
}

#[test]
fn test_replay_regions_as_csv() {
    let home = TempDir::new().unwrap();
    let regions = home.path().join("regions.json");
    fs::write(
        &regions,
        r#"[
            {"text": "田中太郎", "category": "name"},
            {"text": "東京都港区", "category": "address"},
            {"text": "平成5年12月25日", "category": "date"}
        ]"#,
    )
    .unwrap();

    jpid(home.path())
        .args(["replay", "-t", "drivers_license_jp", "--format", "csv", "--regions"])
        .arg(&regions)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "document_type,address,birth_date,municipality,name",
        ))
        .stdout(predicate::str::contains(
            "drivers_license_jp,東京都港区,平成5年12月25日,東京都港区,田中太郎",
        ));
}

#[test]
fn test_replay_reports_missing_field() {
    let home = TempDir::new().unwrap();
    let text = home.path().join("partial.txt");
    fs::write(&text, "住所:東京都港区六本木1-2-3").unwrap();

    jpid(home.path())
        .args(["replay", "-t", "drivers_license_jp", "--text"])
        .arg(&text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("'name'"));
}

#[test]
fn test_replay_rejects_unknown_type() {
    let home = TempDir::new().unwrap();
    let text = home.path().join("card.txt");
    fs::write(&text, "氏名 山田 花子").unwrap();

    jpid(home.path())
        .args(["replay", "-t", "passport_us", "--text"])
        .arg(&text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported document type: passport_us"));
}

#[test]
fn test_replay_requires_input() {
    let home = TempDir::new().unwrap();
    jpid(home.path())
        .args(["replay", "-t", "drivers_license_jp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--text"));
}

#[test]
fn test_config_init_get_set() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("jpid.json");

    jpid(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    jpid(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "server.port"])
        .assert()
        .success()
        .stdout("8080\n");

    jpid(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "server.port", "9090"])
        .assert()
        .success();

    jpid(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "server.port"])
        .assert()
        .success()
        .stdout("9090\n");

    jpid(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("jpid.json");

    jpid(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "server.prot", "9090"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
    assert!(!config.exists());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let home = TempDir::new().unwrap();
    jpid(home.path())
        .arg("--config")
        .arg(home.path().join("absent.json"))
        .arg("types")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
