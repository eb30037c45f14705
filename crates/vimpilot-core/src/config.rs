use std::time::Duration;

/// Tunables for server readiness waiting.
///
/// The remote protocol exposes no readiness event, only the point-in-time
/// serverlist, so startup is a bounded busy-poll: re-query every
/// `poll_interval` until the name appears or `readiness_timeout` elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub readiness_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            readiness_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
        }
    }
}
