//! Process-lifetime state and its guaranteed release.
//!
//! A [`Session`] remembers the working directory and starts the adb server.
//! Dropping it, or running its [`Teardown`] from the Ctrl+C handler, restores
//! the directory and stops the server. Whichever comes first wins; the other
//! is a no-op.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bridge::{Bridge, CommandRunner, SystemRunner};
use crate::error::ToolError;

/// True when `TERM` names a terminal that cannot take interactive input.
pub fn is_dumb_terminal(term: Option<&str>) -> bool {
    term == Some("dumb")
}

/// Cleanup shared between the session and the Ctrl+C handler.
pub struct Teardown {
    previous_dir: PathBuf,
    stop_server: Box<dyn Fn() + Send + Sync>,
    done: AtomicBool,
}

impl Teardown {
    pub fn new(previous_dir: PathBuf, stop_server: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            previous_dir,
            stop_server: Box::new(stop_server),
            done: AtomicBool::new(false),
        }
    }

    /// Restore the working directory and stop the server. Runs at most once.
    pub fn run(&self) {
        if self.done.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = std::env::set_current_dir(&self.previous_dir) {
            log::warn!(
                "Could not return to {}: {}",
                self.previous_dir.display(),
                e
            );
        }
        (self.stop_server)();
    }

    pub fn has_run(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    pub fn previous_dir(&self) -> &Path {
        &self.previous_dir
    }
}

/// One interactive run against the bridge.
pub struct Session<R: CommandRunner = SystemRunner> {
    bridge: Bridge<R>,
    dumb_mode: bool,
    teardown: Arc<Teardown>,
}

impl<R> Session<R>
where
    R: CommandRunner + Clone + Send + Sync + 'static,
{
    /// Record the working directory and prepare the teardown.
    ///
    /// No adb command is issued yet, so the teardown can be handed to an
    /// interrupt handler before [`Session::start_server`] blocks. Dropping the
    /// session always tells the server to stop, started or not.
    pub fn new(bridge: Bridge<R>, dumb_mode: bool) -> Result<Self, ToolError> {
        let previous_dir = std::env::current_dir()?;

        let server = bridge.clone();
        let teardown = Arc::new(Teardown::new(previous_dir, move || {
            if let Err(e) = server.kill_server() {
                log::warn!("Failed to stop adb server: {}", e);
            }
        }));

        Ok(Self {
            bridge,
            dumb_mode,
            teardown,
        })
    }
}

impl<R: CommandRunner> Session<R> {
    /// Start the adb server. Slow on first use while the daemon boots.
    pub fn start_server(&self) -> Result<(), ToolError> {
        self.bridge.start_server()?;
        log::info!("adb server started");
        Ok(())
    }

    pub fn bridge(&self) -> &Bridge<R> {
        &self.bridge
    }

    pub fn dumb_mode(&self) -> bool {
        self.dumb_mode
    }

    /// Handle for running the teardown from outside the session.
    pub fn teardown(&self) -> Arc<Teardown> {
        Arc::clone(&self.teardown)
    }
}

impl<R: CommandRunner> Drop for Session<R> {
    fn drop(&mut self) {
        self.teardown.run();
    }
}
