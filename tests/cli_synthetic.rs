//! Fixture-driven CLI synthetic tests.
//!
//! Each case under `tests/fixtures/synthetic/<case>/` provides:
//! - `input/`    Go sources (and optional `.tagsmith.toml`) copied to a temp directory
//! - `scenario.toml` command list and command-level assertions
//! - `expected/` expected tree after executing the scenario
//!
//! A command may name a file from the case directory in `stdin`; its bytes
//! are piped to the process, which is how overlay archives reach `--modified`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tempfile::TempDir;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(rename = "command")]
    commands: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Step {
    args: Vec<String>,
    #[serde(default)]
    stdin: Option<String>,
    #[serde(default)]
    expect_exit: i32,
    #[serde(default)]
    stdout_contains: Vec<String>,
    #[serde(default)]
    stdout_not_contains: Vec<String>,
    #[serde(default)]
    stderr_contains: Vec<String>,
    #[serde(default)]
    stderr_not_contains: Vec<String>,
}

/// One case directory with its parsed scenario
struct Case {
    name: String,
    dir: PathBuf,
    scenario: Scenario,
}

impl Case {
    fn load(dir: PathBuf) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<unknown-case>".to_string());

        for required in ["input", "expected", "scenario.toml"] {
            assert!(
                dir.join(required).exists(),
                "Case '{}' is missing {}",
                name,
                required
            );
        }

        let raw = fs::read_to_string(dir.join("scenario.toml")).unwrap();
        let scenario = toml::from_str(&raw)
            .unwrap_or_else(|e| panic!("Case '{}' has an invalid scenario.toml: {}", name, e));

        Case {
            name,
            dir,
            scenario,
        }
    }

    fn run(&self) {
        let workdir = TempDir::new().unwrap();
        copy_tree(&self.dir.join("input"), workdir.path());

        for (idx, step) in self.scenario.commands.iter().enumerate() {
            let label = format!("Case '{}', command #{} {:?}", self.name, idx + 1, step.args);
            let stdin = step.stdin.as_ref().map(|file| {
                fs::read(self.dir.join(file))
                    .unwrap_or_else(|e| panic!("{}: cannot read stdin file {}: {}", label, file, e))
            });

            let output = run_tagsmith(workdir.path(), &step.args, stdin.as_deref());
            check_step(&label, step, &output);
        }

        compare_trees(&self.name, &self.dir.join("expected"), workdir.path());
    }
}

#[test]
fn test_synthetic_fixtures() {
    let root = Path::new("tests").join("fixtures").join("synthetic");
    assert!(root.is_dir(), "Fixture root missing: {}", root.display());

    let cases: Vec<Case> = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| Case::load(e.into_path()))
        .collect();
    assert!(!cases.is_empty(), "No synthetic cases under {}", root.display());

    for case in &cases {
        case.run();
    }
}

fn run_tagsmith(cwd: &Path, args: &[String], stdin: Option<&[u8]>) -> Output {
    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_tagsmith"))
        .current_dir(cwd)
        .env_remove("TAGSMITH_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to spawn tagsmith with {:?}: {}", args, e));

    if let (Some(bytes), Some(mut pipe)) = (stdin, child.stdin.take()) {
        pipe.write_all(bytes).unwrap();
    }

    child.wait_with_output().unwrap()
}

fn check_step(label: &str, step: &Step, output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(
        output.status.code(),
        Some(step.expect_exit),
        "{}: unexpected exit status\nstdout:\n{}\nstderr:\n{}",
        label,
        stdout,
        stderr
    );

    let streams = [
        ("stdout", &stdout, &step.stdout_contains, true),
        ("stdout", &stdout, &step.stdout_not_contains, false),
        ("stderr", &stderr, &step.stderr_contains, true),
        ("stderr", &stderr, &step.stderr_not_contains, false),
    ];
    for (stream, text, needles, wanted) in streams {
        for needle in needles {
            assert_eq!(
                text.contains(needle.as_str()),
                wanted,
                "{}: {} {} {:?}\n{}:\n{}",
                label,
                stream,
                if wanted { "lacks" } else { "unexpectedly has" },
                needle,
                stream,
                text
            );
        }
    }
}

fn copy_tree(from: &Path, to: &Path) {
    for entry in WalkDir::new(from).min_depth(1).into_iter().filter_map(|e| e.ok()) {
        let target = to.join(entry.path().strip_prefix(from).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else if entry.file_type().is_file() {
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Relative path to content of every file under `root`
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

fn compare_trees(case_name: &str, expected_root: &Path, actual_root: &Path) {
    let expected = snapshot(expected_root);
    let actual = snapshot(actual_root);

    let expected_paths: Vec<_> = expected.keys().collect();
    let actual_paths: Vec<_> = actual.keys().collect();
    assert_eq!(
        expected_paths, actual_paths,
        "Case '{}': file sets differ",
        case_name
    );

    for (rel, want) in &expected {
        let got = &actual[rel];
        if want == got {
            continue;
        }

        match (std::str::from_utf8(want), std::str::from_utf8(got)) {
            (Ok(want), Ok(got)) => {
                let (want, got) = (want.replace("\r\n", "\n"), got.replace("\r\n", "\n"));
                if want != got {
                    panic!(
                        "Case '{}': {} differs\n{}",
                        case_name,
                        rel.display(),
                        describe_difference(&want, &got)
                    );
                }
            }
            _ => panic!(
                "Case '{}': binary file {} differs ({} vs {} bytes)",
                case_name,
                rel.display(),
                want.len(),
                got.len()
            ),
        }
    }
}

fn describe_difference(expected: &str, actual: &str) -> String {
    let mismatch = expected
        .lines()
        .zip(actual.lines())
        .enumerate()
        .find(|(_, (e, a))| e != a);

    match mismatch {
        Some((i, (e, a))) => format!(
            "line {}:\nexpected: {:?}\nactual:   {:?}",
            i + 1,
            e,
            a
        ),
        None => format!(
            "expected {} lines, got {}",
            expected.lines().count(),
            actual.lines().count()
        ),
    }
}
