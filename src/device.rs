//! Attached device discovery and selection.
//!
//! Parses the output of `adb devices` and lets the user pick a target when
//! more than one device is attached.

use std::fmt;
use std::io::{BufRead, Write};

use crate::bridge::{Bridge, CommandRunner};
use crate::error::ToolError;
use crate::prompt::Prompter;

/// Header printed by `adb devices` before the device rows.
const LISTING_HEADER: &str = "List of devices attached";

/// A single attached device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Opaque identifier handed back by adb
    pub serial: String,
    /// Connection state as reported by adb (`device`, `unauthorized`, `offline`, ...)
    pub state: String,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serial)
    }
}

/// Parse `adb devices` output into the device rows, in listing order.
///
/// The header, daemon notices (`* daemon started successfully`) and blank
/// lines are skipped.
pub fn parse_device_list(output: &str) -> Vec<Device> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('*'))
        .filter(|line| !line.starts_with(LISTING_HEADER))
        .filter_map(parse_device_line)
        .collect()
}

/// Parse one `serial<TAB>state` row.
pub fn parse_device_line(line: &str) -> Option<Device> {
    let (serial, state) = match line.split_once('\t') {
        Some(parts) => parts,
        None => {
            log::warn!("Skipping unexpected device line: {:?}", line);
            return None;
        }
    };

    let serial = serial.trim();
    if serial.is_empty() {
        return None;
    }

    Some(Device {
        serial: serial.to_string(),
        state: state.trim().to_string(),
    })
}

/// Build the numbered device question shown when several devices are attached.
pub fn device_question(devices: &[Device]) -> String {
    let mut question = String::from("Enter id of device to target:\n");
    for (i, device) in devices.iter().enumerate() {
        question.push_str(&format!("\n    {} - {}", i + 1, device));
    }
    question.push('\n');
    question
}

/// Pick the device to work on.
///
/// One attached device is selected without asking. With several the user is
/// prompted for a 1-based index, defaulting to the first one.
pub fn select_device<C, R, W>(
    bridge: &Bridge<C>,
    prompter: &mut Prompter<R, W>,
) -> Result<Device, ToolError>
where
    C: CommandRunner,
    R: BufRead,
    W: Write,
{
    let mut devices = bridge.devices()?;
    log::info!("Found {} attached device(s)", devices.len());

    match devices.len() {
        0 => Err(ToolError::NoDeviceFound),
        1 => Ok(devices.remove(0)),
        count => {
            prompter.blank_line()?;
            let question = device_question(&devices);
            let max_value = u32::try_from(count).unwrap_or(u32::MAX);
            let id = prompter.ask(&question, max_value, 1, true)?;
            let index = usize::try_from(id - 1).unwrap_or(0);
            Ok(devices.swap_remove(index))
        }
    }
}
