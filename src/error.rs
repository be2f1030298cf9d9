//! Error types and their process exit codes.

use crate::bridge::BridgeError;
use crate::config::ConfigError;

/// Missing required executable (EX_DATAERR, kept for compatibility with older scripts).
pub const EXIT_MISSING_DEPENDENCY: i32 = 65;
/// I/O failure while talking to the terminal.
pub const EXIT_IO: i32 = 74;
/// Configuration file could not be read or parsed.
pub const EXIT_CONFIG: i32 = 78;
pub const EXIT_ELEVATION_DENIED: i32 = 80;
pub const EXIT_REMOUNT_FAILED: i32 = 81;
/// Killed by the user (128 + SIGINT).
pub const EXIT_USER_ABORT: i32 = 130;

/// Everything that can stop a session.
///
/// Invalid answers at a prompt never show up here: the prompt loop recovers
/// from them by asking again.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Missing executable => {executable}")]
    MissingDependency { executable: String },

    #[error("No device detected! Please connect your device first.")]
    NoDeviceFound,

    #[error("Killed by the user, now exiting ;)")]
    UserAbort,

    #[error(
        "You do NOT have root or root access is disabled.\n\n\
         Enable it in Settings -> Developer options -> Root access -> Apps and ADB."
    )]
    ElevationDenied { output: String },

    #[error("Remount failed.")]
    RemountFailed { output: String },

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Process exit status for this error.
    ///
    /// A failed external command hands its own status through; a command
    /// killed by a signal has none and maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolError::MissingDependency { .. } => EXIT_MISSING_DEPENDENCY,
            ToolError::NoDeviceFound => 0,
            ToolError::UserAbort => EXIT_USER_ABORT,
            ToolError::ElevationDenied { .. } => EXIT_ELEVATION_DENIED,
            ToolError::RemountFailed { .. } => EXIT_REMOUNT_FAILED,
            ToolError::Bridge(e) => e.exit_code(),
            ToolError::Config(_) => EXIT_CONFIG,
            ToolError::Io(_) => EXIT_IO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = ToolError::MissingDependency {
            executable: "adb".to_string(),
        };
        assert_eq!(missing.exit_code(), 65);
        assert_eq!(ToolError::NoDeviceFound.exit_code(), 0);
        assert_eq!(ToolError::UserAbort.exit_code(), 130);
        assert_eq!(
            ToolError::ElevationDenied {
                output: String::new()
            }
            .exit_code(),
            80
        );
        assert_eq!(
            ToolError::RemountFailed {
                output: String::new()
            }
            .exit_code(),
            81
        );
    }

    #[test]
    fn test_failed_command_status_is_propagated() {
        let err = ToolError::from(BridgeError::CommandFailed {
            command: "adb uninstall com.android.vending".to_string(),
            status: Some(3),
            stderr: String::new(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_signal_killed_command_maps_to_one() {
        let err = ToolError::from(BridgeError::CommandFailed {
            command: "adb devices".to_string(),
            status: None,
            stderr: String::new(),
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_dependency_message() {
        let err = ToolError::MissingDependency {
            executable: "adb".to_string(),
        };
        assert_eq!(err.to_string(), "Missing executable => adb");
    }
}
