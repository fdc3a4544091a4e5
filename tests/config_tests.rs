//! Integration tests for .tagsmith.toml defaults

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{tagsmith_cmd, write_go};

const SOURCE: &str = "package conf\n\ntype Settings struct {\n\tMaxConns int\n}\n";

#[test]
fn test_discovered_config_supplies_defaults() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(
        temp.path().join(".tagsmith.toml"),
        "transform = \"camelcase\"\nformat = \"json\"\n",
    )
    .unwrap();
    let file = write_go(&pkg, "conf.go", SOURCE);

    tagsmith_cmd()
        .arg("--file")
        .arg(&file)
        .args(["--all", "--add-tags", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start\": 1"))
        .stdout(predicate::str::contains("`json:\\\"maxConns\\\"`"));
}

#[test]
fn test_flags_win_over_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".tagsmith.toml"),
        "transform = \"camelcase\"\nformat = \"json\"\n",
    )
    .unwrap();
    let file = write_go(temp.path(), "conf.go", SOURCE);

    tagsmith_cmd()
        .arg("--file")
        .arg(&file)
        .args([
            "--all",
            "--add-tags",
            "json",
            "--transform",
            "snakecase",
            "--format",
            "source",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\tMaxConns int `json:\"max_conns\"`\n"));
}

#[test]
fn test_config_from_environment() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "transform = \"lispcase\"\nsort = true\n").unwrap();
    let file = write_go(temp.path(), "conf.go", SOURCE);

    tagsmith_cmd()
        .env("TAGSMITH_CONFIG", &config)
        .arg("--file")
        .arg(&file)
        .args(["--all", "--add-tags", "yaml,json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\tMaxConns int `json:\"max-conns\" yaml:\"max-conns\"`\n",
        ));
}

#[test]
fn test_invalid_config() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".tagsmith.toml"), "transform = 42\n").unwrap();
    let file = write_go(temp.path(), "conf.go", SOURCE);

    tagsmith_cmd()
        .arg("--file")
        .arg(&file)
        .args(["--all", "--add-tags", "json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TOML deserialization error"));
}

#[test]
fn test_missing_config_from_environment() {
    let temp = TempDir::new().unwrap();
    let file = write_go(temp.path(), "conf.go", SOURCE);

    tagsmith_cmd()
        .env("TAGSMITH_CONFIG", temp.path().join("nope.toml"))
        .arg("--file")
        .arg(&file)
        .args(["--all", "--add-tags", "json"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("config file not found"));
}
