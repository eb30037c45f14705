use std::fmt;
use std::path::{Path, PathBuf};

/// How the Vim process is attached to the world at spawn time.
///
/// Terminal builds frequently refuse to activate clientserver support without
/// a controlling terminal, so headless spawns go through a pseudo-terminal.
/// GUI builds are spawned detached with their standard streams closed so they
/// neither block the parent nor inherit its terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverMode {
    Headless,
    Gui,
}

/// An executable plus the spawn strategy to use for it.
///
/// Equality is defined on path and mode, so two drivers pointing at the same
/// binary in the same mode compare equal regardless of how they were chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    executable: PathBuf,
    mode: DriverMode,
}

impl Driver {
    pub fn new(executable: impl Into<PathBuf>, mode: DriverMode) -> Self {
        Self {
            executable: executable.into(),
            mode,
        }
    }

    pub fn headless(executable: impl Into<PathBuf>) -> Self {
        Self::new(executable, DriverMode::Headless)
    }

    pub fn gui(executable: impl Into<PathBuf>) -> Self {
        Self::new(executable, DriverMode::Gui)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn mode(&self) -> DriverMode {
        self.mode
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.executable.display(), self.mode)
    }
}

/// A live Vim process spawned by a [`Driver`].
///
/// The handle keeps the spawn-strategy resources alive: the PTY master for
/// headless spawns (closing it would hang up the child), or the detached
/// child for GUI spawns. Dropping the handle does not kill the process;
/// termination is always explicit.
pub struct ProcessHandle {
    pid: u32,
    resources: SpawnResources,
}

pub(crate) enum SpawnResources {
    Pty {
        // Held for the lifetime of the process; never read from. Vim paints
        // its screen into the PTY and we only care that the terminal exists.
        _master: Box<dyn portable_pty::MasterPty + Send>,
        child: Box<dyn portable_pty::Child + Send + Sync>,
    },
    Detached {
        child: std::process::Child,
    },
}

impl ProcessHandle {
    pub(crate) fn new(pid: u32, resources: SpawnResources) -> Self {
        Self { pid, resources }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Wait for the child to exit so it does not linger as a zombie.
    /// Called after the process has been signaled.
    pub(crate) fn reap(&mut self) {
        match &mut self.resources {
            SpawnResources::Pty { child, .. } => {
                let _ = child.wait();
            }
            SpawnResources::Detached { child } => {
                let _ = child.wait();
            }
        }
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}
