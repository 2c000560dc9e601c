//! Basic CLI integration tests.

#![allow(deprecated)] // Command::cargo_bin deprecated for custom build-dir; still works for default

use assert_cmd::Command;

#[test]
fn help_prints_and_exits_success() {
    Command::cargo_bin("ean-search")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn subcommand_help_lists_operations() {
    let out = Command::cargo_bin("ean-search")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    for sub in ["name", "lookup", "isbn", "verify", "search", "country", "image"] {
        assert!(stdout.contains(sub), "help should list `{}`", sub);
    }
}

#[test]
fn missing_token_reports_error() {
    let out = Command::cargo_bin("ean-search")
        .unwrap()
        .env_remove("EAN_SEARCH_API_TOKEN")
        // point the config dir somewhere empty so a developer's real config
        // cannot supply a token
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("ean-search-no-config"))
        .args(["name", "5099750442227"])
        .assert()
        .failure();
    let stderr = std::str::from_utf8(&out.get_output().stderr).unwrap();
    assert!(stderr.contains("no API token"));
}

#[test]
fn verify_requires_barcode_argument() {
    Command::cargo_bin("ean-search")
        .unwrap()
        .arg("verify")
        .assert()
        .failure();
}
