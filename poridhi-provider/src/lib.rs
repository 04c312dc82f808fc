//! VM provisioning through the Weave Ignite CLI.
//!
//! The tool itself is reached through the [`ToolRunner`] capability from
//! `poridhi-core`, so every workflow here can run against a scripted runner.

pub mod ignite;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use ignite::{
    CopyFile, IgniteProvider, LaunchConfig, LaunchOutcome, Manifest, NodeIdentity, VmRecord,
};
pub use poridhi_core::command_stream::{CommandRunner, ToolConfig, ToolRunner};
pub use poridhi_core::error::{LaunchStage, ProvisionError, Result as ProvisionResult};
