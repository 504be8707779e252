#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Runs the binary against a throwaway database, in a directory with no config file.
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("classplan").expect("Failed to find classplan binary");
        cmd.current_dir(self.temp_dir.path())
            .env("CLASSPLAN_DATABASE_PATH", &self.db_path)
            .env("CLASSPLAN_SCHEDULE__TIMEZONE", "UTC")
            .env("CLASSPLAN_USER_ID", "1")
            .env_remove("CLASSPLAN_LOG");
        cmd
    }

    pub fn dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a `--json` command and parses its stdout.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.command().args(args).arg("--json").output().expect("Failed to run classplan");
        assert!(output.status.success(), "command failed: {:?}", args);
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
    }
}

pub struct TestFixtures;

impl TestFixtures {
    /// SE1801 with lecturer 7 on Monday 2024-03-04, 09:00-10:30 in room 204.
    pub fn monday_session() -> Vec<&'static str> {
        vec![
            "add", "--subject", "12", "--class", "SE1801", "--lecturer", "7",
            "--start", "09:00", "--end", "10:30", "--date", "2024-03-04", "--room", "204",
        ]
    }

    pub fn weekly_template() -> Vec<&'static str> {
        vec![
            "add", "--subject", "12", "--class", "SE1801", "--lecturer", "7",
            "--start", "13:00", "--end", "14:30", "--term", "3",
        ]
    }
}

pub mod assertions {
    use predicates::prelude::*;

    pub fn session_created() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Created session"))
    }

    pub fn has_session_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Class"))
            .and(predicate::str::contains("Lecturer"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
    }
}
