use std::error::Error;

use crate::driver::DriverError;
use crate::server::ServerError;

/// Base trait for all library errors.
pub trait VimpilotError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be reported as a caller mistake rather than
    /// an environment failure
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the library
pub type VimpilotResult<T> = Result<T, Box<dyn VimpilotError>>;

impl VimpilotError for DriverError {
    fn error_code(&self) -> &'static str {
        match self {
            DriverError::SpawnFailed { .. } => "DRIVER_SPAWN_FAILED",
            DriverError::MissingPid { .. } => "DRIVER_MISSING_PID",
            DriverError::CommandFailed { .. } => "DRIVER_COMMAND_FAILED",
        }
    }
}

impl VimpilotError for ServerError {
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::NoSuitableExecutable { .. } => "NO_SUITABLE_EXECUTABLE",
            ServerError::StartupTimeout { .. } => "STARTUP_TIMEOUT",
            ServerError::InvalidCommand { .. } => "INVALID_COMMAND",
            ServerError::VimrcWriteFailed { .. } => "VIMRC_WRITE_FAILED",
            ServerError::Driver(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ServerError::NoSuitableExecutable { .. } | ServerError::InvalidCommand { .. }
        )
    }
}
