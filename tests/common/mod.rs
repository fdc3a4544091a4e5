#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub fn tagsmith_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagsmith").unwrap();
    cmd.env_remove("TAGSMITH_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a Go file into `dir` and return its path
pub fn write_go(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Build an overlay archive holding one file
pub fn overlay_archive(name: &str, content: &str) -> String {
    format!("{}\n{}\n{}", name, content.len(), content)
}
