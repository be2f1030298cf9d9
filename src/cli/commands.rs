//! The interactive session flow.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::args::Args;
use crate::action::{self, Action};
use crate::bridge::{self, Bridge, CommandRunner};
use crate::config::Config;
use crate::device::{self, Device};
use crate::error::ToolError;
use crate::platform;
use crate::prompt::Prompter;

/// Find the adb executable to drive.
///
/// `--adb` wins over the configured executable. Both may be bare names,
/// which are searched in the tool directories and then PATH.
pub fn resolve_executable(args: &Args, config: &Config) -> Result<PathBuf, ToolError> {
    let name = match &args.adb {
        Some(path) => path.to_string_lossy().into_owned(),
        None => config.bridge.executable.clone(),
    };
    let path = bridge::locate_executable(&name, &config.tool_dirs())?;
    log::info!("Using adb at {}", path.display());
    Ok(path)
}

/// Print what is about to happen.
fn print_summary<W: Write>(out: &mut W, device: &Device, action: Action) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        " *** OS: {} ({})",
        platform::os_description(),
        platform::platform()
    )?;
    writeln!(out, " *** Selected device: {}", device)?;
    writeln!(out, " *** Action: {}", action)
}

/// Select a device, ask for an action and run it.
///
/// Returns the action that was chosen; [`Action::Exit`] means nothing was
/// done to the device.
pub fn run_session<C, R, W>(
    bridge: &Bridge<C>,
    prompter: &mut Prompter<R, W>,
) -> Result<Action, ToolError>
where
    C: CommandRunner,
    R: BufRead,
    W: Write,
{
    let device = device::select_device(bridge, prompter)?;
    log::info!("Selected device {} ({})", device.serial, device.state);

    let action = action::choose_action(prompter)?;
    print_summary(prompter.output_mut(), &device, action)?;

    if action == Action::Exit {
        return Ok(action);
    }

    action::execute(action, bridge, &device, prompter.output_mut())?;
    writeln!(prompter.output_mut(), " *** Done!")?;
    Ok(action)
}

/// Print the diagnostic for an error that ends the session.
///
/// Non-zero exits other than a user abort are followed by the
/// `ERROR CODE:` line.
pub fn report_error<W: Write>(out: &mut W, err: &ToolError) -> std::io::Result<()> {
    if let ToolError::UserAbort = err {
        return writeln!(out, "\n\n{}", err);
    }

    writeln!(out, "\nERROR: {}", err)?;
    let code = err.exit_code();
    if code != 0 {
        writeln!(out, "\nERROR CODE: {}", code)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reported(err: &ToolError) -> String {
        let mut out = Vec::new();
        report_error(&mut out, err).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_no_device_has_no_error_code() {
        assert_eq!(
            reported(&ToolError::NoDeviceFound),
            "\nERROR: No device detected! Please connect your device first.\n"
        );
    }

    #[test]
    fn test_report_remount_failure_with_code() {
        let out = reported(&ToolError::RemountFailed {
            output: "remount failed: Permission denied".to_string(),
        });
        assert_eq!(out, "\nERROR: Remount failed.\n\nERROR CODE: 81\n");
    }

    #[test]
    fn test_report_user_abort() {
        assert_eq!(
            reported(&ToolError::UserAbort),
            "\n\nKilled by the user, now exiting ;)\n"
        );
    }
}
