//! Common test utilities and helpers

use metricdiff::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture manager for creating temporary test environments
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a (not necessarily existing) file under the fixture root
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create a test CSV file from unquoted cell data
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> Result<PathBuf> {
        let path = self.path(name);
        let mut content = String::new();

        for row in data {
            content.push_str(&row.join(","));
            content.push('\n');
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a test CSV file with raw string content
    pub fn create_csv_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run a metricdiff command and return the result
    pub fn run_command(&self, args: &[&str]) -> Result<()> {
        use clap::Parser;
        use metricdiff::cli::Cli;
        use metricdiff::commands::execute_command;

        let mut cmd_args = vec!["metricdiff"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| metricdiff::MetricdiffError::invalid_input(e.to_string()))?;

        execute_command(cli.command)
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) {
        self.run_command(args).expect("Command should succeed");
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> metricdiff::MetricdiffError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// Sample data generators for testing
pub mod sample_data {
    pub fn baseline_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["name", "package", "contributor", "line_count", "package_count"],
            vec!["core/parser", "core", "alice", "100", "2"],
            vec!["core/lexer", "core", "alice", "40", "1"],
            vec!["util/strings", "util", "bob", "25", "1"],
        ]
    }

    pub fn updated_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["name", "package", "contributor", "line_count", "package_count"],
            vec!["core/parser", "core", "alice", "130", "2"], // grown
            vec!["core/lexer", "core", "alice", "40", "1"],   // unchanged
            vec!["web/router", "web", "carol", "60", "3"],    // new, strings removed
        ]
    }
}
