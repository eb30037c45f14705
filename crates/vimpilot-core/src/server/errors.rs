use std::time::Duration;

use crate::driver::DriverError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("No suitable Vim executable: '{executable}' cannot be resolved")]
    NoSuitableExecutable { executable: String },

    #[error("Timed out after {timeout:?} waiting for server '{name}' to appear in the serverlist")]
    StartupTimeout { name: String, timeout: Duration },

    #[error("Vim rejected the remote expression: {output}")]
    InvalidCommand { output: String },

    #[error("Failed to write startup vimrc: {source}")]
    VimrcWriteFailed {
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),
}
