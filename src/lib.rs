//! adb-toolbox library crate.
//!
//! Drives the `adb` executable to pick an attached device and strip GApps /
//! microG from it. The binary wires these pieces to the real terminal; the
//! library exposes them for integration testing.

pub mod action;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod platform;
pub mod prompt;
pub mod session;
pub mod test_utils;
