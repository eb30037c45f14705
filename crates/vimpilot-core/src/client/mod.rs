//! Human-friendly operations over the remote primitives.
//!
//! A [`Client`] owns its [`Server`] and turns "edit this file", "type this
//! text" into the right mix of keystroke injection and helper-function
//! expressions. Ex commands run through `VimpilotRunCommand`, the helper the
//! startup script defines inside the instance, because the remote protocol
//! itself can only evaluate expressions, not capture command output.

use std::path::Path;
use std::time::Duration;

use crate::escape::{escape_expression, escape_filename};
use crate::server::{Server, ServerError};

#[derive(Debug)]
pub struct Client {
    server: Server,
}

impl Client {
    pub fn new(server: Server) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Execute an Ex command in the instance and return its output with the
    /// surrounding whitespace stripped.
    ///
    /// An unknown or failing command surfaces as
    /// [`ServerError::InvalidCommand`] carrying Vim's own error text.
    pub fn command(&self, command: &str) -> Result<String, ServerError> {
        let output = self.server.remote_expr(&build_command_expression(command))?;
        Ok(output.trim().to_string())
    }

    /// Send a key sequence as-is. The wrapper methods (`normal`, `insert`,
    /// ...) are usually the better choice.
    pub fn type_keys(&self, keys: &str) -> Result<(), ServerError> {
        self.server.remote_send(keys)
    }

    /// Drop back to normal mode, then run the given keys there.
    pub fn normal(&self, keys: &str) -> Result<(), ServerError> {
        self.server.remote_send(&format!("<C-\\><C-n>{keys}"))
    }

    /// Switch to insert mode and type the text.
    pub fn insert(&self, text: &str) -> Result<(), ServerError> {
        self.normal(&format!("i{text}"))
    }

    /// Append the text after the cursor.
    pub fn append(&self, text: &str) -> Result<(), ServerError> {
        self.normal(&format!("a{text}"))
    }

    /// Search for the given text, leaving the cursor on its first occurrence.
    pub fn search(&self, text: &str) -> Result<(), ServerError> {
        self.normal("")?;
        self.type_keys(&format!("/{text}<CR>"))
    }

    /// Open a file for editing.
    ///
    /// This types the `:edit` command rather than using `--remote`, so the
    /// instance never steals window focus; the path goes through filename
    /// escaping on its way onto Vim's command line.
    pub fn edit(&self, path: impl AsRef<Path>) -> Result<String, ServerError> {
        let escaped = escape_filename(&path.as_ref().display().to_string());
        self.command(&format!("edit {escaped}"))
    }

    /// Write the current buffer to disk.
    pub fn write(&self) -> Result<String, ServerError> {
        self.command("write")
    }

    /// Source a Vim script file inside the instance.
    pub fn source(&self, path: impl AsRef<Path>) -> Result<String, ServerError> {
        let escaped = escape_filename(&path.as_ref().display().to_string());
        self.command(&format!("source {escaped}"))
    }

    /// Echo each expression, space-separated, and return the output.
    pub fn echo(&self, expressions: &[&str]) -> Result<String, ServerError> {
        self.command(&format!("echo {}", expressions.join(" ")))
    }

    /// Set an option; without a value the option is treated as boolean.
    pub fn set(&self, option: &str, value: Option<&str>) -> Result<String, ServerError> {
        match value {
            Some(value) => self.command(&format!("set {option}={value}")),
            None => self.command(&format!("set {option}")),
        }
    }

    /// Feed keys through Vim's `feedkeys()`, queueing them as typed input.
    pub fn feedkeys(&self, keys: &str) -> Result<(), ServerError> {
        self.server
            .remote_expr(&format!("feedkeys('{}')", escape_expression(keys)))?;
        Ok(())
    }

    /// Add a plugin directory to the instance's runtime path. Instances
    /// start with `--noplugin`, so this is how a test environment gets
    /// populated.
    pub fn add_plugin(
        &self,
        dir: impl AsRef<Path>,
        entry_script: Option<&str>,
    ) -> Result<(), ServerError> {
        self.command(&format!("set runtimepath+={}", dir.as_ref().display()))?;
        if let Some(script) = entry_script {
            self.command(&format!("runtime {script}"))?;
        }
        Ok(())
    }

    /// Save all buffers and exit the instance from the inside.
    pub fn quit(&self) -> Result<(), ServerError> {
        self.normal("ZZ")
    }

    // Passthroughs to the server primitives.

    pub fn remote_send(&self, keys: &str) -> Result<(), ServerError> {
        self.server.remote_send(keys)
    }

    pub fn remote_expr(&self, expression: &str) -> Result<String, ServerError> {
        self.server.remote_expr(expression)
    }

    pub fn serverlist(&self) -> Result<Vec<String>, ServerError> {
        self.server.serverlist()
    }

    pub fn is_running(&self) -> bool {
        self.server.is_running()
    }

    /// Kill the server process this client's server owns. A no-op (`false`)
    /// for clients obtained via connect, which own nothing.
    pub fn kill(&mut self) -> bool {
        self.server.kill()
    }
}

/// Wrap an Ex command in the server-side capture helper, with the command
/// escaped for its single-quoted string literal.
fn build_command_expression(command: &str) -> String {
    format!("VimpilotRunCommand('{}')", escape_expression(command))
}

/// Attach to a named instance using the default headless/GUI selection.
/// `None` if the instance is not discoverable within `timeout`.
pub fn connect(name: &str, timeout: Option<Duration>) -> Option<Client> {
    Server::with_name(crate::platform::select_driver(None, false), name).connect(timeout)
}

/// Like [`connect`], but a missing instance is a [`ServerError::StartupTimeout`].
pub fn connect_strict(name: &str, timeout: Option<Duration>) -> Result<Client, ServerError> {
    Server::with_name(crate::platform::select_driver(None, false), name).connect_strict(timeout)
}
