//! Capability probing for candidate Vim binaries.
//!
//! Remote control needs `+clientserver`, and headless use additionally wants
//! `+xterm_clipboard` (terminal builds without it tend to misbehave under
//! remote control). The probe runs one `--version` invocation and scans the
//! output for the feature markers; a binary that cannot be invoked at all
//! reports no features, which is what lets selection fall back to a GUI
//! variant instead of failing outright.

use std::path::Path;

use tracing::debug;

use crate::driver::Driver;

/// Feature flags parsed from a `--version` banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VimFeatures {
    pub client_server: bool,
    pub xterm_clipboard: bool,
}

impl VimFeatures {
    /// The empty feature set, reported for binaries that cannot be invoked.
    pub const fn none() -> Self {
        Self {
            client_server: false,
            xterm_clipboard: false,
        }
    }

    /// Whether this binary can be trusted to run remote control from a
    /// terminal.
    pub fn suitable_for_headless(&self) -> bool {
        self.client_server && self.xterm_clipboard
    }
}

/// Probe a candidate executable for remote-control capabilities.
///
/// One attempt, no retry. The markers are matched order-independently
/// anywhere in the output.
pub fn probe(executable: &Path) -> VimFeatures {
    match Driver::headless(executable).run(&["--version"]) {
        Ok(output) => VimFeatures {
            client_server: output.contains("+clientserver"),
            xterm_clipboard: output.contains("+xterm_clipboard"),
        },
        Err(e) => {
            debug!(
                event = "core.probe.version_failed",
                executable = %executable.display(),
                error = %e
            );
            VimFeatures::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_executable_reports_no_features() {
        let features = probe(Path::new("/nonexistent/vimpilot-test-vim"));
        assert_eq!(features, VimFeatures::none());
    }

    #[test]
    fn test_suitable_for_headless_needs_both_features() {
        assert!(
            VimFeatures {
                client_server: true,
                xterm_clipboard: true
            }
            .suitable_for_headless()
        );
        assert!(
            !VimFeatures {
                client_server: true,
                xterm_clipboard: false
            }
            .suitable_for_headless()
        );
        assert!(
            !VimFeatures {
                client_server: false,
                xterm_clipboard: true
            }
            .suitable_for_headless()
        );
        assert!(!VimFeatures::none().suitable_for_headless());
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_matches_markers_order_independently() {
        // echo prints its arguments back, standing in for a version banner.
        let features = probe(Path::new("/bin/echo"));
        assert_eq!(features, VimFeatures::none());

        let script = write_stub("+xterm_clipboard then +clientserver");
        let features = probe(&script);
        assert!(features.client_server);
        assert!(features.xterm_clipboard);
    }

    #[cfg(unix)]
    fn write_stub(banner: &str) -> tempfile::TempPath {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let mut file = tempfile::Builder::new()
            .prefix("stub-vim-")
            .tempfile()
            .unwrap();
        writeln!(file, "#!/bin/sh\nprintf '%s\\n' \"{banner}\"").unwrap();
        file.flush().unwrap();
        let path = file.into_temp_path();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }
}
