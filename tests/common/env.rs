//! Test environment builder for isolated Edgesite testing.
//!
//! Provides `TestEnv` - an isolated project directory with its own user
//! config location and local cloud file, plus helpers to run the CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use edgesite::LocalCloud;
use tempfile::TempDir;

use super::fixtures::{cloud_with_zone, ERROR_HTML, INDEX_HTML};

/// Result of running an Edgesite CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse every non-empty stdout line as JSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .unwrap_or_else(|e| panic!("stdout line is not JSON ({}): {}", e, l))
            })
            .collect()
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory standing in for HOME
    pub home_dir: TempDir,
}

impl TestEnv {
    /// Create a new TestEnvBuilder
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// The local cloud file the CLI reads and writes
    pub fn cloud_path(&self) -> PathBuf {
        self.project_path(".edgesite/cloud.json")
    }

    /// Snapshot of the cloud as the CLI left it
    pub fn cloud(&self) -> LocalCloud {
        LocalCloud::open(self.cloud_path()).expect("Failed to open local cloud")
    }

    pub fn read_state(&self) -> String {
        std::fs::read_to_string(self.project_path(".edgesite/state.toml")).unwrap_or_default()
    }

    /// Run edgesite in this environment from project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run edgesite from project root with extra env vars.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from_with_env(self.project_root.path(), args, env_vars)
    }

    pub fn run_from_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_edgesite"));
        cmd.current_dir(cwd)
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("TERM", "dumb")
            .env_remove("EDGESITE_ACCOUNT")
            .env_remove("EDGESITE_REGION")
            .env_remove("EDGESITE_PROFILE")
            .env_remove("EDGESITE_VALIDATION_TIMEOUT")
            .env_remove("EDGESITE_VIEWER_POLICY");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute edgesite");
        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Write a file to the project directory
    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        let full_path = self.project_path(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
    }

    pub fn remove_project_file(&self, relative_path: &str) {
        std::fs::remove_file(self.project_path(relative_path)).expect("Failed to remove file");
    }
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    config: Option<String>,
    zone: Option<String>,
    files: Vec<(String, String)>,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            zone: Some("example.com".to_string()),
            files: Vec::new(),
        }
    }

    /// Set edgesite.toml content
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config = Some(toml.to_string());
        self
    }

    /// Seed the cloud with a public zone (default `example.com`)
    pub fn with_zone(mut self, zone: &str) -> Self {
        self.zone = Some(zone.to_string());
        self
    }

    /// Start with an empty cloud
    pub fn without_zone(mut self) -> Self {
        self.zone = None;
        self
    }

    /// Add a file relative to the project root
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.to_string()));
        self
    }

    /// `public/index.html` and `public/error.html`
    pub fn with_default_site(self) -> Self {
        self.with_file("public/index.html", INDEX_HTML)
            .with_file("public/error.html", ERROR_HTML)
    }

    pub fn build(self) -> TestEnv {
        let project_root = TempDir::new().expect("Failed to create project temp dir");
        let home_dir = TempDir::new().expect("Failed to create home temp dir");
        let env = TestEnv {
            project_root,
            home_dir,
        };

        if let Some(config) = &self.config {
            env.write_project_file("edgesite.toml", config);
        }
        if let Some(zone) = &self.zone {
            env.write_project_file(".edgesite/cloud.json", &cloud_with_zone(zone));
        }
        for (path, content) in &self.files {
            env.write_project_file(path, content);
        }
        env
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
