use poridhi_core::command_stream::ToolRunner;
use poridhi_core::error::{LaunchStage, ProvisionError, Result};
use tracing::{debug, info, info_span};

use super::config::LaunchConfig;
use super::identity::NodeIdentity;
use super::listing::{find_address, parse_listing, VmRecord};
use super::manifest::{Manifest, ManifestFile};

/// What a successful launch reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub name: String,
    pub uid: NodeIdentity,
    pub ip: String,
}

/// Drives ignite through a [`ToolRunner`].
///
/// Launch runs identity, manifest, manifest file, `run`, `ps` and address
/// lookup in order and stops at the first failure. List is `ps` plus parsing.
pub struct IgniteProvider<R> {
    runner: R,
}

impl<R: ToolRunner> IgniteProvider<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Launch a VM under a freshly generated identity.
    pub fn launch(&self, config: &LaunchConfig) -> Result<LaunchOutcome> {
        let identity =
            NodeIdentity::generate().map_err(|e| e.at_stage(LaunchStage::GenerateIdentity))?;
        self.launch_with_identity(config, identity)
    }

    /// Launch a VM under a caller-chosen identity.
    ///
    /// Identities must not be reused across launches.
    pub fn launch_with_identity(
        &self,
        config: &LaunchConfig,
        identity: NodeIdentity,
    ) -> Result<LaunchOutcome> {
        let span = info_span!("launch", name = config.name(), uid = %identity);
        let _enter = span.enter();

        let manifest = Manifest::build(config, &identity);
        debug!(stage = %LaunchStage::BuildManifest, "manifest built");

        let manifest_file =
            ManifestFile::write(&manifest).map_err(|e| e.at_stage(LaunchStage::WriteManifest))?;
        debug!(path = %manifest_file.path().display(), "manifest written");

        let config_path = manifest_file
            .path_arg()
            .map_err(|e| e.at_stage(LaunchStage::WriteManifest))?;
        let run_result = self.runner.run(&["run", "--config", config_path]);
        // The manifest is only needed for the run call.
        drop(manifest_file);
        run_result.map_err(|e| e.at_stage(LaunchStage::RunTool))?;

        let status = self
            .runner
            .run(&["ps"])
            .map_err(|e| e.at_stage(LaunchStage::QueryStatus))?;
        let ip = find_address(&status.stdout, config.name())
            .map_err(|e| e.at_stage(LaunchStage::ResolveAddress))?;

        info!(ip = %ip, "VM launched");
        Ok(LaunchOutcome {
            name: config.name().to_string(),
            uid: identity,
            ip,
        })
    }

    /// List every VM ignite knows about.
    pub fn list(&self) -> Result<Vec<VmRecord>> {
        let output = self.runner.run(&["ps"]).map_err(|e| ProvisionError::List {
            source: Box::new(e),
        })?;
        let records = parse_listing(&output.stdout);
        debug!(count = records.len(), "parsed VM listing");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRunner;

    const LISTING: &str = "VM ID  IMAGE  KERNEL  SIZE  CPUS  MEMORY  CREATED  STATUS  IPS  PORTS  NAME\n\
        i-1 img k 1 GB 2 512 MB Jan 1 Running extra 10.0.0.5 node-a\n\
        i-2 img:v1 k 3 GB 2 1 GB 4m ago Up 4m 10.0.0.9 test-vm\n";

    fn test_config() -> LaunchConfig {
        LaunchConfig::new("test-vm", 2, "1GB", "3GB", "img:v1", true).unwrap()
    }

    fn fixed_identity() -> NodeIdentity {
        NodeIdentity::parse("deadbeefdeadbeef").unwrap()
    }

    #[test]
    fn test_launch_runs_then_queries_status() {
        let provider = IgniteProvider::new(MockRunner::new().with_listing(LISTING));
        let outcome = provider
            .launch_with_identity(&test_config(), fixed_identity())
            .unwrap();

        assert_eq!(outcome.name, "test-vm");
        assert_eq!(outcome.uid.as_str(), "deadbeefdeadbeef");
        assert_eq!(outcome.ip, "10.0.0.9");

        let calls = provider.runner().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0][0..2], ["run", "--config"]);
        assert_eq!(calls[1], ["ps"]);
    }

    #[test]
    fn test_launch_hands_manifest_to_run_and_removes_it() {
        let provider = IgniteProvider::new(MockRunner::new().with_listing(LISTING));
        provider
            .launch_with_identity(&test_config(), fixed_identity())
            .unwrap();

        let seen = provider.runner().manifests();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contents.contains("uid: deadbeefdeadbeef"));
        assert!(seen[0].contents.contains("cpus: 2"));
        assert!(seen[0].contents.contains("memory: 1GB"));
        assert!(seen[0].contents.contains("ssh: true"));
        assert!(!seen[0].path.exists());
    }

    #[test]
    fn test_launch_generates_fresh_identity() {
        let provider = IgniteProvider::new(MockRunner::new().with_listing(LISTING));
        let first = provider.launch(&test_config()).unwrap();
        let second = provider.launch(&test_config()).unwrap();
        assert_ne!(first.uid, second.uid);

        let seen = provider.runner().manifests();
        assert!(seen[0].contents.contains(first.uid.as_str()));
        assert!(seen[1].contents.contains(second.uid.as_str()));
    }

    #[test]
    fn test_run_failure_stops_before_status_query() {
        let runner = MockRunner::new()
            .with_listing(LISTING)
            .failing_run("pulling image...", "FATA[0001] image not found");
        let provider = IgniteProvider::new(runner);

        let err = provider
            .launch_with_identity(&test_config(), fixed_identity())
            .unwrap_err();

        assert_eq!(err.stage(), Some(LaunchStage::RunTool));
        let msg = err.to_string();
        assert!(msg.starts_with("failed to run ignite"));
        assert!(msg.contains("Stdout: pulling image..."));
        assert!(msg.contains("Stderr: FATA[0001] image not found"));

        let calls = provider.runner().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], "run");

        let seen = provider.runner().manifests();
        assert!(!seen[0].path.exists());
    }

    #[test]
    fn test_status_query_failure_is_reported() {
        let runner = MockRunner::new().failing_ps("", "sudo: a password is required");
        let provider = IgniteProvider::new(runner);
        let err = provider
            .launch_with_identity(&test_config(), fixed_identity())
            .unwrap_err();
        assert_eq!(err.stage(), Some(LaunchStage::QueryStatus));
        assert!(err.to_string().contains("sudo: a password is required"));

        let seen = provider.runner().manifests();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].path.exists());
    }

    #[test]
    fn test_missing_address_after_run() {
        let listing = "VM ID  IMAGE  KERNEL  SIZE  CPUS  MEMORY  CREATED  STATUS  IPS  PORTS  NAME\n\
            i-1 img k 1 GB 2 512 MB Jan 1 Running extra 10.0.0.5 node-a\n";
        let provider = IgniteProvider::new(MockRunner::new().with_listing(listing));
        let err = provider
            .launch_with_identity(&test_config(), fixed_identity())
            .unwrap_err();
        assert_eq!(err.stage(), Some(LaunchStage::ResolveAddress));
        assert!(matches!(
            err.root_cause(),
            ProvisionError::AddressNotFound(name) if name == "test-vm"
        ));

        let seen = provider.runner().manifests();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].path.exists());
    }

    #[test]
    fn test_list_parses_records() {
        let listing = format!("{LISTING}short row\n");
        let provider = IgniteProvider::new(MockRunner::new().with_listing(listing));
        let records = provider.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "node-a");
        assert_eq!(records[1].name, "test-vm");
        assert_eq!(records[1].created, "4m ago");
        assert_eq!(provider.runner().calls(), vec![vec!["ps".to_string()]]);
    }

    #[test]
    fn test_list_failure_wrapped() {
        let provider = IgniteProvider::new(MockRunner::new().failing_ps("", "boom"));
        let err = provider.list().unwrap_err();
        assert!(err.to_string().starts_with("failed to list VMs"));
        assert!(matches!(err.root_cause(), ProvisionError::ProcessFailed { .. }));
    }
}
