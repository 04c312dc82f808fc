//! Weave Ignite provisioning: identity, manifest, listing and the launch
//! workflow that ties them together.

pub mod config;
pub mod identity;
pub mod listing;
pub mod manifest;
pub mod provider;

pub use config::{CopyFile, LaunchConfig};
pub use identity::NodeIdentity;
pub use listing::{find_address, parse_listing, VmRecord, RECORD_HEADERS};
pub use manifest::{Manifest, ManifestFile};
pub use provider::{IgniteProvider, LaunchOutcome};
