// Standard library
use std::process::Output;
use std::thread;
use std::time::{Duration, Instant};

// External crates
use crate::error::{ProvisionError, Result};
use duct::cmd;
use tracing::{debug, info, warn};
use which::which;

const DEFAULT_TOOL: &str = "ignite";
const DEFAULT_ELEVATE_PROGRAM: &str = "sudo";
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long a timed-out tool gets to exit after SIGTERM before SIGKILL.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// How the external VM tool is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Tool binary, looked up on `PATH` unless it is a path.
    pub program: String,
    /// Run the tool through `elevate_program`.
    pub elevate: bool,
    pub elevate_program: String,
    /// Kill the child once this much time has passed. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_TOOL.to_string(),
            elevate: true,
            elevate_program: DEFAULT_ELEVATE_PROGRAM.to_string(),
            timeout: None,
        }
    }
}

impl ToolConfig {
    /// The full argv for one invocation, elevation prefix included.
    pub fn argv(&self, args: &[&str]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        if self.elevate {
            argv.push(self.elevate_program.clone());
        }
        argv.push(self.program.clone());
        argv.extend(args.iter().map(|a| a.to_string()));
        argv
    }
}

/// Captured result of one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub success: bool,
    /// Exit status as reported by the OS, e.g. `exit status: 1`.
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    fn from_output(output: &Output) -> Self {
        Self {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Turn a failed exit into `ProcessFailed`, keeping both streams as-is.
    pub fn into_checked(self, command: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        Err(ProvisionError::ProcessFailed {
            command: command.to_string(),
            status: self.status,
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

/// Capability to execute the external VM tool.
///
/// Implementations block until the child exits. There are no retries: one
/// call is one attempt.
pub trait ToolRunner {
    /// Name of the tool, used in error messages.
    fn tool_name(&self) -> &str;

    /// Run the tool with `args` and capture its output whatever the exit status.
    fn execute(&self, args: &[&str]) -> Result<ProcessResult>;

    /// Run the tool and fail with `ProcessFailed` on a non-zero exit.
    fn run(&self, args: &[&str]) -> Result<ProcessResult> {
        self.execute(args)?.into_checked(self.tool_name())
    }
}

/// Runs the tool as a real child process via `duct`.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    config: ToolConfig,
}

impl CommandRunner {
    /// Build a runner, checking that every program in the chain is installed.
    pub fn new(config: ToolConfig) -> Result<Self> {
        if config.elevate && !is_tool_installed(&config.elevate_program) {
            return Err(ProvisionError::Dependency(config.elevate_program.clone()));
        }
        if !is_tool_installed(&config.program) {
            return Err(ProvisionError::Dependency(config.program.clone()));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn wait_with_deadline(
        &self,
        expression: duct::Expression,
        full_command: &str,
        timeout: Duration,
    ) -> Result<ProcessResult> {
        let handle = in_own_process_group(expression)
            .start()
            .map_err(|source| ProvisionError::ProcessSpawn {
                command: full_command.to_string(),
                source,
            })?;
        let started = Instant::now();

        loop {
            match handle.try_wait() {
                Ok(Some(output)) => return Ok(ProcessResult::from_output(output)),
                Ok(None) if started.elapsed() >= timeout => {
                    warn!(command = %full_command, ?timeout, "stopping timed-out command");
                    terminate(&handle);
                    return Err(ProvisionError::Timeout {
                        command: full_command.to_string(),
                        after: timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    return Err(ProvisionError::ProcessSpawn {
                        command: full_command.to_string(),
                        source,
                    })
                }
            }
        }
    }
}

impl ToolRunner for CommandRunner {
    fn tool_name(&self) -> &str {
        &self.config.program
    }

    fn execute(&self, args: &[&str]) -> Result<ProcessResult> {
        let argv = self.config.argv(args);
        let full_command = argv.join(" ");
        info!(command = %full_command, "running ignite command");

        let expression = cmd(&argv[0], &argv[1..])
            .stdout_capture()
            .stderr_capture()
            .unchecked();

        let result = match self.config.timeout {
            None => {
                let output = expression
                    .run()
                    .map_err(|source| ProvisionError::ProcessSpawn {
                        command: full_command.clone(),
                        source,
                    })?;
                ProcessResult::from_output(&output)
            }
            Some(timeout) => self.wait_with_deadline(expression, &full_command, timeout)?,
        };

        debug!(
            command = %full_command,
            status = %result.status,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "command finished"
        );
        Ok(result)
    }
}

// The timed-out tool must go down with everything it forked, so it leads its
// own process group. sudo relays SIGTERM to the command it runs.
#[cfg(unix)]
fn in_own_process_group(expression: duct::Expression) -> duct::Expression {
    use std::os::unix::process::CommandExt;

    expression.before_spawn(|command| {
        command.process_group(0);
        Ok(())
    })
}

#[cfg(not(unix))]
fn in_own_process_group(expression: duct::Expression) -> duct::Expression {
    expression
}

#[cfg(unix)]
fn terminate(handle: &duct::Handle) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let signal_groups = |signal: Signal| {
        for pid in handle.pids() {
            // EPERM for root-owned members is expected; sudo relays for them.
            if let Err(errno) = killpg(Pid::from_raw(pid as i32), signal) {
                debug!(pid, ?signal, %errno, "signalling process group failed");
            }
        }
    };

    signal_groups(Signal::SIGTERM);
    let deadline = Instant::now() + KILL_GRACE;
    while Instant::now() < deadline {
        if matches!(handle.try_wait(), Ok(Some(_))) {
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }
    signal_groups(Signal::SIGKILL);
    let _ = handle.kill();
}

#[cfg(not(unix))]
fn terminate(handle: &duct::Handle) {
    let _ = handle.kill();
}

/// Checks if a command-line tool is available in the system's PATH.
pub fn is_tool_installed(tool_name: &str) -> bool {
    which(tool_name).is_ok()
}
