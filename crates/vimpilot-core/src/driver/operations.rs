use std::path::Path;
use std::process::{Command, Stdio};

use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use tracing::{debug, warn};

use super::errors::DriverError;
use super::types::{Driver, DriverMode, ProcessHandle, SpawnResources};

impl Driver {
    /// Spawn a Vim server process under the given instance name.
    ///
    /// Headless mode attaches the child to a fresh pseudo-terminal; GUI mode
    /// spawns it detached with standard streams closed and `-f` so the window
    /// process does not fork away from the pid we track.
    pub fn spawn(&self, name: &str, vimrc: &Path) -> Result<ProcessHandle, DriverError> {
        debug!(
            event = "core.driver.spawn_started",
            executable = %self.executable().display(),
            mode = ?self.mode(),
            name = name
        );

        let handle = match self.mode() {
            DriverMode::Headless => self.spawn_pty(name, vimrc)?,
            DriverMode::Gui => self.spawn_detached(name, vimrc)?,
        };

        debug!(
            event = "core.driver.spawn_completed",
            pid = handle.pid(),
            name = name
        );
        Ok(handle)
    }

    fn spawn_pty(&self, name: &str, vimrc: &Path) -> Result<ProcessHandle, DriverError> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| DriverError::SpawnFailed {
                executable: self.executable().display().to_string(),
                message: format!("openpty: {e}"),
            })?;

        let mut cmd = CommandBuilder::new(self.executable());
        cmd.arg("-u");
        cmd.arg(vimrc);
        cmd.arg("--noplugin");
        cmd.arg("--servername");
        cmd.arg(name);

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| DriverError::SpawnFailed {
                executable: self.executable().display().to_string(),
                message: e.to_string(),
            })?;
        // The slave end belongs to the child now; the master must stay open
        // for the lifetime of the process or Vim sees a hangup.
        drop(pair.slave);

        let pid = child.process_id().ok_or_else(|| DriverError::MissingPid {
            executable: self.executable().display().to_string(),
        })?;

        Ok(ProcessHandle::new(
            pid,
            SpawnResources::Pty {
                _master: pair.master,
                child,
            },
        ))
    }

    fn spawn_detached(&self, name: &str, vimrc: &Path) -> Result<ProcessHandle, DriverError> {
        let child = Command::new(self.executable())
            .arg("-f")
            .arg("-u")
            .arg(vimrc)
            .arg("--noplugin")
            .arg("--servername")
            .arg(name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DriverError::SpawnFailed {
                executable: self.executable().display().to_string(),
                message: e.to_string(),
            })?;

        let pid = child.id();
        Ok(ProcessHandle::new(pid, SpawnResources::Detached { child }))
    }

    /// Signal the process to terminate.
    ///
    /// Returns `true` if a live process existed and was signaled, `false` if
    /// it was already gone. Never an error: killing an absent process is an
    /// expected outcome, not a failure.
    pub fn kill(&self, pid: u32) -> bool {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => {
                debug!(event = "core.driver.kill_signaled", pid = pid);
                true
            }
            Err(nix::errno::Errno::ESRCH) => {
                debug!(event = "core.driver.kill_already_gone", pid = pid);
                false
            }
            Err(e) => {
                warn!(event = "core.driver.kill_failed", pid = pid, error = %e);
                false
            }
        }
    }

    /// Run the driver's executable synchronously and capture stdout, with
    /// trailing whitespace trimmed. Used for serverlist queries and version
    /// probing, where the trailing newline is noise.
    pub fn run(&self, args: &[&str]) -> Result<String, DriverError> {
        let raw = self.run_raw(args)?;
        Ok(raw.trim_end().to_string())
    }

    /// Same as [`Driver::run`] but without trimming. Remote expression
    /// results are whitespace-significant, so their raw text is preserved.
    pub fn run_raw(&self, args: &[&str]) -> Result<String, DriverError> {
        let output = Command::new(self.executable())
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DriverError::CommandFailed {
                executable: self.executable().display().to_string(),
                source,
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
