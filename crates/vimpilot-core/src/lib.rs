//! vimpilot-core: drive a remote-controlled Vim process.
//!
//! This library starts Vim as a uniquely named server, waits for it to become
//! discoverable, and controls it through the clientserver command-line
//! protocol (`--remote-send`, `--remote-expr`, `--serverlist`). It is built
//! for automated testing and scripting of Vim itself.
//!
//! # Main Entry Points
//!
//! - [`start`] / [`start_gui`] / [`start_with`] - spawn an instance and get a [`Client`]
//! - [`connect`] / [`connect_strict`] - attach to an already-running instance
//! - [`Server`] - explicit lifecycle control (naming, config, scoped start)
//! - [`platform::select_driver`] - capability-driven executable selection
//!
//! # Example
//!
//! ```no_run
//! let mut vim = vimpilot_core::start()?;
//! vim.edit("notes.txt")?;
//! vim.insert("hello")?;
//! vim.write()?;
//! vim.kill();
//! # Ok::<(), vimpilot_core::ServerError>(())
//! ```

pub mod client;
pub mod config;
pub mod driver;
pub mod errors;
pub mod escape;
pub mod logging;
pub mod platform;
pub mod probe;
pub mod server;

use std::path::Path;
use std::time::Duration;

pub use client::Client;
pub use config::ServerConfig;
pub use driver::{Driver, DriverError, DriverMode, ProcessHandle};
pub use errors::{VimpilotError, VimpilotResult};
pub use escape::{escape_expression, escape_filename};
pub use logging::init_logging;
pub use probe::VimFeatures;
pub use server::{Clock, Server, ServerError, SystemClock};

/// Start a Vim instance using the best executable for this system and return
/// a client controlling it.
pub fn start() -> Result<Client, ServerError> {
    Server::new(platform::select_driver(None, false)).start()
}

/// Start a GUI Vim instance and return a client controlling it.
pub fn start_gui() -> Result<Client, ServerError> {
    Server::new(platform::select_driver(None, true)).start()
}

/// Start an instance of a specific executable.
pub fn start_with(executable: impl AsRef<Path>, gui: bool) -> Result<Client, ServerError> {
    Server::new(platform::select_driver(Some(executable.as_ref()), gui)).start()
}

/// Attach to a running instance by name; `None` when it cannot be found
/// within the default wait.
pub fn connect(name: &str, timeout: Option<Duration>) -> Option<Client> {
    client::connect(name, timeout)
}

/// Attach to a running instance by name, failing loudly when it cannot be
/// found within the wait.
pub fn connect_strict(name: &str, timeout: Option<Duration>) -> Result<Client, ServerError> {
    client::connect_strict(name, timeout)
}
