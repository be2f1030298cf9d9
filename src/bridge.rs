//! Thin wrapper around the `adb` executable.
//!
//! Every method maps to exactly one `adb` invocation. Output is captured and
//! returned as text; a non-zero exit status becomes [`BridgeError::CommandFailed`].
//! The process itself is spawned by a [`CommandRunner`], so the flow above this
//! module can be driven by a scripted runner in tests.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::device::{parse_device_list, Device};
use crate::error::{ToolError, EXIT_IO, EXIT_MISSING_DEPENDENCY};

/// Default name of the device-bridge executable.
pub const DEFAULT_EXECUTABLE: &str = "adb";

/// Errors that can occur while running the bridge executable
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The executable vanished between lookup and spawn
    #[error("Missing executable => {}", .executable.display())]
    NotFound { executable: PathBuf },

    /// The process could not be started
    #[error("Failed to run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully
    #[error("`{command}` exited with status {}{}", display_status(.status), display_stderr(.stderr))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

fn display_status(status: &Option<i32>) -> String {
    status.map_or_else(|| "unknown (killed by signal)".to_string(), |s| s.to_string())
}

fn display_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

impl BridgeError {
    /// Exit status the whole program should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            BridgeError::NotFound { .. } => EXIT_MISSING_DEPENDENCY,
            BridgeError::SpawnFailed { .. } => EXIT_IO,
            BridgeError::CommandFailed { status, .. } => match status {
                Some(code) if *code != 0 => *code,
                _ => 1,
            },
        }
    }
}

/// Captured result of one bridge invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Spawns the bridge executable with a list of arguments and waits for it.
pub trait CommandRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput, BridgeError>;
}

/// Runs the real executable through `std::process::Command`.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    executable: PathBuf,
}

impl SystemRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput, BridgeError> {
        let output = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BridgeError::NotFound {
                        executable: self.executable.clone(),
                    }
                } else {
                    BridgeError::SpawnFailed {
                        command: command_line(args),
                        source: e,
                    }
                }
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn command_line(args: &[&str]) -> String {
    let mut line = String::from(DEFAULT_EXECUTABLE);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// The subset of `adb` this tool needs.
#[derive(Debug, Clone)]
pub struct Bridge<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl<R: CommandRunner> Bridge<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run a command and return its stdout, failing on non-zero exit.
    fn check_output(&self, args: &[&str]) -> Result<String, BridgeError> {
        log::debug!("Running: {}", command_line(args));
        let output = self.runner.run(args)?;
        if !output.success() {
            log::debug!("Command failed with status {:?}", output.status);
            return Err(BridgeError::CommandFailed {
                command: command_line(args),
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }

    /// `start-server`
    pub fn start_server(&self) -> Result<(), BridgeError> {
        self.check_output(&["start-server"]).map(drop)
    }

    /// `kill-server`
    pub fn kill_server(&self) -> Result<(), BridgeError> {
        self.check_output(&["kill-server"]).map(drop)
    }

    /// `devices`, parsed into the attached devices in listing order.
    pub fn devices(&self) -> Result<Vec<Device>, BridgeError> {
        let listing = self.check_output(&["devices"])?;
        Ok(parse_device_list(&listing))
    }

    /// `-s <serial> root`. Returns the raw output; refusal is reported as
    /// text, not through the exit status.
    pub fn root(&self, serial: &str) -> Result<String, BridgeError> {
        self.check_output(&["-s", serial, "root"])
    }

    /// `-s <serial> wait-for-device`
    pub fn wait_for_device(&self, serial: &str) -> Result<(), BridgeError> {
        self.check_output(&["-s", serial, "wait-for-device"]).map(drop)
    }

    /// `-s <serial> remount <path>`. Returns the raw output.
    pub fn remount(&self, serial: &str, path: &str) -> Result<String, BridgeError> {
        self.check_output(&["-s", serial, "remount", path])
    }

    /// `-s <serial> uninstall <package>`
    pub fn uninstall(&self, serial: &str, package: &str) -> Result<(), BridgeError> {
        self.check_output(&["-s", serial, "uninstall", package]).map(drop)
    }

    /// `-s <serial> shell rm -f <paths...>`
    pub fn remove_files(&self, serial: &str, paths: &[&str]) -> Result<(), BridgeError> {
        let mut args = vec!["-s", serial, "shell", "rm", "-f"];
        args.extend_from_slice(paths);
        self.check_output(&args).map(drop)
    }
}

/// Resolve the bridge executable.
///
/// `name` may be a bare name or a path. Bare names are searched in the
/// `extra_dirs` first, then in `PATH`.
pub fn locate_executable(name: &str, extra_dirs: &[PathBuf]) -> Result<PathBuf, ToolError> {
    let cwd = env::current_dir()?;
    let search_path = search_path(extra_dirs);

    which::which_in(name, search_path.as_ref(), &cwd).map_err(|e| {
        log::debug!("Lookup of '{}' failed: {}", name, e);
        ToolError::MissingDependency {
            executable: name.to_string(),
        }
    })
}

fn search_path(extra_dirs: &[PathBuf]) -> Option<OsString> {
    let system = env::var_os("PATH");
    let mut dirs: Vec<PathBuf> = extra_dirs.to_vec();
    if let Some(system) = &system {
        dirs.extend(env::split_paths(system));
    }
    match env::join_paths(dirs) {
        Ok(joined) => Some(joined),
        Err(e) => {
            log::warn!("Ignoring extra tool directories: {}", e);
            system
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedRunner;

    #[test]
    fn test_check_output_returns_stdout() {
        let runner = ScriptedRunner::new();
        runner.push(CommandOutput::ok("restarting adbd as root\n"));
        let bridge = Bridge::new(runner.clone());

        let out = bridge.root("emulator-5554").unwrap();
        assert_eq!(out, "restarting adbd as root\n");
        assert_eq!(runner.calls(), vec![vec!["-s", "emulator-5554", "root"]]);
    }

    #[test]
    fn test_non_zero_exit_is_an_error() {
        let runner = ScriptedRunner::new();
        runner.push(CommandOutput::failed(1, "Failure [DELETE_FAILED_INTERNAL_ERROR]"));
        let bridge = Bridge::new(runner);

        let err = bridge.uninstall("abc", "com.android.vending").unwrap_err();
        assert_eq!(err.exit_code(), 1);
        let msg = err.to_string();
        assert!(msg.contains("adb -s abc uninstall com.android.vending"));
        assert!(msg.contains("DELETE_FAILED_INTERNAL_ERROR"));
    }

    #[test]
    fn test_remove_files_passes_every_path() {
        let runner = ScriptedRunner::new();
        runner.push(CommandOutput::ok(""));
        let bridge = Bridge::new(runner.clone());

        bridge
            .remove_files("abc", &["/system/app/A.apk", "/system/app/B.apk"])
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec![vec![
                "-s",
                "abc",
                "shell",
                "rm",
                "-f",
                "/system/app/A.apk",
                "/system/app/B.apk"
            ]]
        );
    }

    #[test]
    fn test_devices_parses_listing() {
        let runner = ScriptedRunner::new();
        runner.push(CommandOutput::ok(
            "List of devices attached\n0123456789ABCDEF\tdevice\n\n",
        ));
        let bridge = Bridge::new(runner);

        let devices = bridge.devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "0123456789ABCDEF");
    }

    #[test]
    fn test_system_runner_reports_missing_executable() {
        let runner = SystemRunner::new("/nonexistent/path/to/adb-xyz");
        let err = runner.run(&["devices"]).unwrap_err();
        assert!(matches!(err, BridgeError::NotFound { .. }));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_locate_missing_executable() {
        let err = locate_executable("adb-does-not-exist-xyz", &[]).unwrap_err();
        assert_eq!(err.exit_code(), 65);
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_prefers_extra_dirs() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("adb-toolbox-fake-adb");
        std::fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        let found =
            locate_executable("adb-toolbox-fake-adb", &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found, exe);
    }
}
