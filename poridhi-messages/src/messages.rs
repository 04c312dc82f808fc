//! Message templates for the `poridhictl` commands.

pub struct Messages {
    // General
    pub error_generic: &'static str,
    pub dry_run_header: &'static str,

    // Launch
    pub launch_unsupported_kind: &'static str,
    pub launch_success: &'static str,
    pub launch_dry_run_manifest: &'static str,

    // List
    pub list_dry_run: &'static str,
}

pub const MESSAGES: Messages = Messages {
    error_generic: "Error: {error}",
    dry_run_header: "🔍 DRY RUN MODE - showing what would be executed:",

    launch_unsupported_kind: "only 'vm' argument is supported",
    launch_success: "Successfully launched VM:\nName: {name}\nID: {uid}\nIP: {ip}",
    launch_dry_run_manifest: "Manifest for '{name}' (uid {uid}):\n{manifest}",

    list_dry_run: "Would run: {command}",
};
