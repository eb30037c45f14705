#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Failed to spawn '{executable}': {message}")]
    SpawnFailed { executable: String, message: String },

    #[error("Spawned process for '{executable}' reported no pid")]
    MissingPid { executable: String },

    #[error("Failed to run '{executable}': {source}")]
    CommandFailed {
        executable: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_failed_display() {
        let error = DriverError::SpawnFailed {
            executable: "vim".to_string(),
            message: "pty unavailable".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to spawn 'vim': pty unavailable");
    }

    #[test]
    fn test_command_failed_display() {
        let error = DriverError::CommandFailed {
            executable: "gvim".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(error.to_string().contains("gvim"));
    }
}
