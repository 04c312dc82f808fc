//! A scripted stand-in for the ignite binary.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use poridhi_core::command_stream::{ProcessResult, ToolRunner};
use poridhi_core::error::Result;

/// A manifest as it looked when `run --config` was called.
#[derive(Debug, Clone)]
pub struct SeenManifest {
    pub path: PathBuf,
    pub contents: String,
}

/// Returns canned output for `run` and `ps` and records every call.
#[derive(Debug)]
pub struct MockRunner {
    run_result: ProcessResult,
    ps_result: ProcessResult,
    calls: RefCell<Vec<Vec<String>>>,
    manifests: RefCell<Vec<SeenManifest>>,
}

fn succeeded(stdout: &str) -> ProcessResult {
    ProcessResult {
        success: true,
        status: "exit status: 0".to_string(),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn failed(stdout: &str, stderr: &str) -> ProcessResult {
    ProcessResult {
        success: false,
        status: "exit status: 1".to_string(),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self {
            run_result: succeeded(""),
            ps_result: succeeded(""),
            calls: RefCell::new(Vec::new()),
            manifests: RefCell::new(Vec::new()),
        }
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output for `ps`.
    pub fn with_listing(mut self, listing: impl AsRef<str>) -> Self {
        self.ps_result = succeeded(listing.as_ref());
        self
    }

    pub fn failing_run(mut self, stdout: &str, stderr: &str) -> Self {
        self.run_result = failed(stdout, stderr);
        self
    }

    pub fn failing_ps(mut self, stdout: &str, stderr: &str) -> Self {
        self.ps_result = failed(stdout, stderr);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    pub fn manifests(&self) -> Vec<SeenManifest> {
        self.manifests.borrow().clone()
    }

    fn capture_manifest(&self, args: &[&str]) {
        let path = args
            .iter()
            .position(|a| *a == "--config")
            .and_then(|i| args.get(i + 1));
        if let Some(path) = path {
            self.manifests.borrow_mut().push(SeenManifest {
                path: PathBuf::from(path),
                contents: fs::read_to_string(path).unwrap_or_default(),
            });
        }
    }
}

impl ToolRunner for MockRunner {
    fn tool_name(&self) -> &str {
        "ignite"
    }

    fn execute(&self, args: &[&str]) -> Result<ProcessResult> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());

        match args.first().copied() {
            Some("run") => {
                self.capture_manifest(args);
                Ok(self.run_result.clone())
            }
            Some("ps") => Ok(self.ps_result.clone()),
            _ => Ok(failed("", "unknown command")),
        }
    }
}
