//! Ownership and lifecycle of a named Vim server process.
//!
//! A [`Server`] drives exactly one external process: it spawns through its
//! [`Driver`], polls the serverlist until its name appears (the protocol has
//! no readiness notification), exposes the remote primitives, and kills the
//! process it owns. A server obtained via [`Server::connect`] never owns the
//! remote process and its `kill` is a no-op.
//!
//! Nothing here cleans up automatically: dropping a started server leaks the
//! Vim process. Callers either kill explicitly or use the scoped-start form,
//! which guarantees release on every exit path.

pub mod errors;
mod vimrc;
pub mod wait;

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::Client;
use crate::config::ServerConfig;
use crate::driver::{Driver, ProcessHandle};

pub use errors::ServerError;
pub use wait::{Clock, SystemClock};

const NAME_PREFIX: &str = "VIMPILOT_";

pub struct Server {
    name: String,
    driver: Driver,
    config: ServerConfig,
    process: Option<ProcessHandle>,
    // Keeps the materialized startup script alive while the process runs.
    startup_script: Option<NamedTempFile>,
    clock: Box<dyn Clock + Send>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("name", &self.name)
            .field("driver", &self.driver)
            .field("pid", &self.pid())
            .finish_non_exhaustive()
    }
}

impl Server {
    /// A server with a generated instance name.
    pub fn new(driver: Driver) -> Self {
        let name = format!("{NAME_PREFIX}{}", Uuid::new_v4().simple());
        Self::with_name(driver, &name)
    }

    /// A server under an explicit instance name.
    ///
    /// Names are uppercased on the way in: the remote protocol matches them
    /// case-insensitively, so one canonical case keeps serverlist comparisons
    /// exact.
    pub fn with_name(driver: Driver, name: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            driver,
            config: ServerConfig::default(),
            process: None,
            startup_script: None,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the time source, for deterministic waits in tests.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send>) -> Self {
        self.clock = clock;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Pid of the owned process, if this server spawned one.
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(ProcessHandle::pid)
    }

    /// Spawn the server process (unless the name is already live) and block
    /// until it is discoverable, then hand back a [`Client`] for it.
    ///
    /// Fails with [`ServerError::NoSuitableExecutable`] when the driver's
    /// executable cannot be resolved, and [`ServerError::StartupTimeout`]
    /// when the name never appears; in the latter case the process that was
    /// spawned is killed before returning.
    pub fn start(mut self) -> Result<Client, ServerError> {
        self.boot()?;
        Ok(Client::new(self))
    }

    /// Scoped acquisition with guaranteed release: start, run `f`, and kill
    /// the process on every exit path out of `f`, including panics.
    pub fn start_scoped<T>(self, f: impl FnOnce(&mut Client) -> T) -> Result<T, ServerError> {
        struct KillOnDrop(Client);

        impl Drop for KillOnDrop {
            fn drop(&mut self) {
                self.0.kill();
            }
        }

        let mut guard = KillOnDrop(self.start()?);
        Ok(f(&mut guard.0))
    }

    fn boot(&mut self) -> Result<(), ServerError> {
        info!(
            event = "core.server.start_started",
            name = %self.name,
            driver = %self.driver
        );

        if which::which(self.driver.executable()).is_err() {
            return Err(ServerError::NoSuitableExecutable {
                executable: self.driver.executable().display().to_string(),
            });
        }

        if self.is_running() {
            warn!(event = "core.server.already_running", name = %self.name);
            return Ok(());
        }

        let script = vimrc::materialize()?;
        let handle = self.driver.spawn(&self.name, script.path())?;
        self.startup_script = Some(script);
        self.process = Some(handle);

        if !self.wait_for_listing(self.config.readiness_timeout) {
            let timeout = self.config.readiness_timeout;
            warn!(event = "core.server.start_timeout", name = %self.name, timeout = ?timeout);
            self.kill();
            return Err(ServerError::StartupTimeout {
                name: self.name.clone(),
                timeout,
            });
        }

        info!(event = "core.server.start_completed", name = %self.name, pid = self.pid());
        Ok(())
    }

    /// Attach to an already-running instance without spawning anything.
    ///
    /// Polls for the name under the same bounded wait as startup; `None`
    /// when it never appears. The returned client controls a process this
    /// server does not own, so its `kill` will be a no-op.
    pub fn connect(self, timeout: Option<Duration>) -> Option<Client> {
        match self.connect_strict(timeout) {
            Ok(client) => Some(client),
            Err(_) => None,
        }
    }

    /// Like [`Server::connect`] but a missing instance is an error.
    pub fn connect_strict(self, timeout: Option<Duration>) -> Result<Client, ServerError> {
        let timeout = timeout.unwrap_or(self.config.readiness_timeout);
        debug!(event = "core.server.connect_started", name = %self.name, timeout = ?timeout);

        if self.wait_for_listing(timeout) {
            Ok(Client::new(self))
        } else {
            Err(ServerError::StartupTimeout {
                name: self.name.clone(),
                timeout,
            })
        }
    }

    fn wait_for_listing(&self, timeout: Duration) -> bool {
        wait::wait_until(
            timeout,
            self.config.poll_interval,
            self.clock.as_ref(),
            || self.is_running(),
        )
    }

    /// Whether the instance name shows up in a fresh serverlist query.
    pub fn is_running(&self) -> bool {
        match self.serverlist() {
            Ok(names) => names.iter().any(|n| n == &self.name),
            Err(e) => {
                debug!(event = "core.server.serverlist_failed", name = %self.name, error = %e);
                false
            }
        }
    }

    /// Names of the currently running Vim servers this driver can see.
    pub fn serverlist(&self) -> Result<Vec<String>, ServerError> {
        let output = self.driver.run(&["--serverlist"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Fire-and-forget keystroke injection.
    pub fn remote_send(&self, keys: &str) -> Result<(), ServerError> {
        debug!(event = "core.server.remote_send", name = %self.name, keys = keys);
        self.driver
            .run(&["--servername", &self.name, "--remote-send", keys])?;
        Ok(())
    }

    /// Evaluate an expression in the server and return the raw result.
    ///
    /// The text is deliberately not trimmed: expression values can be
    /// whitespace-significant, so that judgement belongs to the caller.
    /// Vim reports failures as ordinary text on the same channel; a result
    /// matching its error-message shape is converted to
    /// [`ServerError::InvalidCommand`] carrying that text.
    pub fn remote_expr(&self, expression: &str) -> Result<String, ServerError> {
        debug!(event = "core.server.remote_expr", name = %self.name, expression = expression);
        let output = self
            .driver
            .run_raw(&["--servername", &self.name, "--remote-expr", expression])?;

        if is_vim_error(&output) {
            return Err(ServerError::InvalidCommand { output });
        }
        Ok(output)
    }

    /// Terminate the owned process, reap it, and drop the handle.
    ///
    /// Idempotent and infallible: `false` when this server owns nothing
    /// (never started, already killed, or only connected) or the process was
    /// already gone.
    pub fn kill(&mut self) -> bool {
        let Some(mut handle) = self.process.take() else {
            debug!(event = "core.server.kill_skipped", name = %self.name);
            return false;
        };

        let signaled = self.driver.kill(handle.pid());
        handle.reap();
        self.startup_script = None;

        info!(
            event = "core.server.kill_completed",
            name = %self.name,
            pid = handle.pid(),
            signaled = signaled
        );
        signaled
    }
}

/// Vim has no structured error channel; failed remote expressions come back
/// as ordinary text shaped like `Vim:E123: message`, possibly not on the
/// first line. Detection is necessarily pattern-based.
fn is_vim_error(output: &str) -> bool {
    static VIM_ERROR: OnceLock<Regex> = OnceLock::new();
    VIM_ERROR
        .get_or_init(|| Regex::new(r"(?m)^Vim:E\d+:").expect("static pattern compiles"))
        .is_match(output)
}
