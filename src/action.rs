//! The maintenance actions offered by the main menu.

use std::fmt;
use std::io::{BufRead, Write};

use crate::bridge::{Bridge, CommandRunner};
use crate::device::Device;
use crate::error::ToolError;
use crate::prompt::Prompter;

/// Partition made writable before files are deleted.
pub const SYSTEM_PARTITION: &str = "/system";

/// Failure marker in `adb remount` output.
const REMOUNT_FAILED: &str = "remount failed";
/// Reported by some devices although the remount worked.
const REMOUNT_FAILED_SUCCESS: &str = "remount failed: Success";

/// Markers in `adb root` output meaning adbd stays unprivileged.
const ROOT_REFUSED: [&str; 2] = ["root access is disabled", "adbd cannot run as root"];

/// Packages and files removed by one action.
#[derive(Debug, Clone, Copy)]
pub struct RemovalList {
    pub packages: &'static [&'static str],
    pub files: &'static [&'static str],
}

/// GApps / microG, minimal removal.
pub const GAPPS_REMOVAL: RemovalList = RemovalList {
    packages: &[
        "org.microg.gms.droidguard",
        "com.google.android.youtube",
        "com.android.vending",
        "com.google.android.gsf.login",
        "com.google.android.gsf",
        "com.google.android.gms",
    ],
    files: &[
        "/system/app/YouTube.apk",
        "/system/priv-app/GooglePartnerSetup.apk",
        "/system/priv-app/Phonesky.apk",
        "/system/priv-app/Vending.apk",
        "/system/priv-app/GoogleLoginService.apk",
        "/system/priv-app/GoogleServicesFramework.apk",
        "/system/priv-app/GsfProxy.apk",
        "/system/priv-app/GmsCore.apk",
        "/system/priv-app/NetworkLocation.apk",
        "/system/app/GooglePartnerSetup.apk",
        "/system/app/Phonesky.apk",
        "/system/app/Vending.apk",
        "/system/app/GoogleLoginService.apk",
        "/system/app/GoogleServicesFramework.apk",
        "/system/app/GsfProxy.apk",
        "/system/app/GmsCore.apk",
        "/system/app/NetworkLocation.apk",
    ],
};

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UninstallGapps,
    Exit,
}

impl Action {
    /// Menu order; entry `n` is answered with `n + 1`.
    pub const ALL: [Action; 2] = [Action::UninstallGapps, Action::Exit];
    pub const DEFAULT: Action = Action::Exit;

    pub fn label(self) -> &'static str {
        match self {
            Action::UninstallGapps => "Uninstall GApps / microG (minimal)",
            Action::Exit => "Exit",
        }
    }

    pub fn number(self) -> u32 {
        match self {
            Action::UninstallGapps => 1,
            Action::Exit => 2,
        }
    }

    pub fn from_number(n: u32) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.number() == n)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Main menu text.
pub fn menu_question() -> String {
    let mut question = String::from("MENU\n");
    for action in Action::ALL {
        question.push_str(&format!("\n    {} - {}", action.number(), action.label()));
    }
    question.push('\n');
    question
}

/// Show the main menu and return the chosen action.
pub fn choose_action<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Action, ToolError> {
    let max_value = Action::ALL.len() as u32;
    let n = prompter.ask(&menu_question(), max_value, Action::DEFAULT.number(), true)?;
    Ok(Action::from_number(n).unwrap_or(Action::DEFAULT))
}

/// True when `adb root` output says elevation was refused.
pub fn root_refused(output: &str) -> bool {
    ROOT_REFUSED.iter().any(|marker| output.contains(marker))
}

/// True unless a line of `adb remount` output reports a real failure.
///
/// `remount failed: Success` is the one failure line that is ignored; it
/// must match exactly.
pub fn remount_succeeded(output: &str) -> bool {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.contains(REMOUNT_FAILED))
        .all(|line| line == REMOUNT_FAILED_SUCCESS)
}

/// Restart adbd as root on the device and wait for it to come back.
pub fn elevate<C: CommandRunner, W: Write>(
    bridge: &Bridge<C>,
    device: &Device,
    out: &mut W,
) -> Result<(), ToolError> {
    writeln!(out, " *** Rooting adbd...")?;
    let output = bridge.root(&device.serial)?;
    if root_refused(&output) {
        return Err(ToolError::ElevationDenied { output });
    }
    log::debug!("{}", output.trim_end());
    bridge.wait_for_device(&device.serial)?;
    Ok(())
}

/// Gain root and remount the system partition read-write.
pub fn enable_device_writing<C: CommandRunner, W: Write>(
    bridge: &Bridge<C>,
    device: &Device,
    out: &mut W,
) -> Result<(), ToolError> {
    elevate(bridge, device, out)?;
    let output = bridge.remount(&device.serial, SYSTEM_PARTITION)?;
    log::debug!("{}", output.trim_end());
    if !remount_succeeded(&output) {
        return Err(ToolError::RemountFailed { output });
    }
    Ok(())
}

/// Uninstall every package, then delete every file of `list`.
///
/// Stops at the first failing command; already removed items stay removed.
pub fn apply_removal<C: CommandRunner>(
    bridge: &Bridge<C>,
    device: &Device,
    list: &RemovalList,
) -> Result<(), ToolError> {
    for package in list.packages {
        log::info!("Uninstalling {}", package);
        bridge.uninstall(&device.serial, package)?;
    }
    if !list.files.is_empty() {
        log::info!("Deleting {} file(s)", list.files.len());
        bridge.remove_files(&device.serial, list.files)?;
    }
    Ok(())
}

/// Remove GApps / microG from the device.
pub fn uninstall_gapps<C: CommandRunner, W: Write>(
    bridge: &Bridge<C>,
    device: &Device,
    out: &mut W,
) -> Result<(), ToolError> {
    enable_device_writing(bridge, device, out)?;
    writeln!(out, " *** Uninstalling GApps / microG...")?;
    apply_removal(bridge, device, &GAPPS_REMOVAL)
}

/// Run the chosen action against the device.
pub fn execute<C: CommandRunner, W: Write>(
    action: Action,
    bridge: &Bridge<C>,
    device: &Device,
    out: &mut W,
) -> Result<(), ToolError> {
    match action {
        Action::UninstallGapps => uninstall_gapps(bridge, device, out),
        Action::Exit => Ok(()),
    }
}
