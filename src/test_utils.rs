//! Test utilities for adb-toolbox
//!
//! Provides a scripted [`CommandRunner`] that stands in for the real adb
//! executable and records every invocation.
//!
//! # Example
//!
//! ```
//! use adb_toolbox::bridge::{Bridge, CommandOutput};
//! use adb_toolbox::test_utils::ScriptedRunner;
//!
//! let runner = ScriptedRunner::new();
//! runner.respond("devices", CommandOutput::ok("List of devices attached\nabc\tdevice\n\n"));
//! let bridge = Bridge::new(runner.clone());
//! assert_eq!(bridge.devices().unwrap().len(), 1);
//! assert_eq!(runner.calls(), vec![vec!["devices"]]);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::bridge::{BridgeError, CommandOutput, CommandRunner};

#[derive(Debug, Default)]
struct Script {
    /// Replies for a given subcommand, consumed in order
    by_subcommand: HashMap<String, VecDeque<CommandOutput>>,
    /// Replies for any command, consumed in order
    queue: VecDeque<CommandOutput>,
    calls: Vec<Vec<String>>,
}

/// Fake runner replaying canned outputs.
///
/// A call is answered from the replies registered for its subcommand first,
/// then from the general queue, and succeeds with empty output when neither
/// has anything left. Clones share the same script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    script: Arc<Mutex<Script>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a reply for the next call, whatever it is.
    pub fn push(&self, output: CommandOutput) {
        self.lock().queue.push_back(output);
    }

    /// Queue a reply for the next call of `subcommand` (`root`, `remount`, ...).
    pub fn respond(&self, subcommand: &str, output: CommandOutput) {
        self.lock()
            .by_subcommand
            .entry(subcommand.to_string())
            .or_default()
            .push_back(output);
    }

    /// Every argument list received so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.lock().calls.clone()
    }

    /// Subcommands received so far, with the `-s <serial>` prefix stripped.
    pub fn subcommands(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|args| subcommand(args).map(str::to_string))
            .collect()
    }
}

fn subcommand(args: &[String]) -> Option<&str> {
    match args.first().map(String::as_str) {
        Some("-s") => args.get(2).map(String::as_str),
        other => other,
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput, BridgeError> {
        let mut script = self.lock();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

        let keyed = subcommand(&args)
            .and_then(|sub| script.by_subcommand.get_mut(sub))
            .and_then(VecDeque::pop_front);
        let reply = keyed
            .or_else(|| script.queue.pop_front())
            .unwrap_or_else(|| CommandOutput::ok(""));

        script.calls.push(args);
        Ok(reply)
    }
}

/// `adb devices` output listing the given serials as ready devices.
pub fn device_listing(serials: &[&str]) -> String {
    let mut listing = String::from("List of devices attached\n");
    for serial in serials {
        listing.push_str(serial);
        listing.push_str("\tdevice\n");
    }
    listing.push('\n');
    listing
}
