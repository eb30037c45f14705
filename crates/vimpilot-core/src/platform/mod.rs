//! Driver selection.
//!
//! The selection policy is a pure function of its explicit inputs (requested
//! path, GUI flag, platform, probe results) so the full decision matrix can
//! be tested without touching the system. [`select_driver`] binds the real
//! prober and the compile-time platform for production use.
//!
//! Terminal builds frequently lack remote-control or clipboard support; the
//! GUI variants are the reliable fallback. Selection itself never fails for a
//! missing binary — it returns its best-guess driver and lets server startup
//! surface the failure when the executable turns out to be unusable.

use std::path::Path;

use tracing::debug;

use crate::driver::Driver;
use crate::probe::{self, VimFeatures};

/// Default terminal binary probed for headless use.
pub const TERMINAL_VIM: &str = "vim";
/// Platform GUI defaults used when no explicit path is given.
pub const GUI_VIM_MAC: &str = "mvim";
pub const GUI_VIM: &str = "gvim";

/// Map the selection inputs to a driver.
///
/// An explicit path is always honored as-is; without one, the terminal
/// default is probed and the platform GUI default is the fallback.
pub fn choose_driver<F>(
    explicit: Option<&Path>,
    gui_requested: bool,
    platform_is_mac: bool,
    probe: F,
) -> Driver
where
    F: Fn(&Path) -> VimFeatures,
{
    match (explicit, gui_requested) {
        (Some(path), true) => Driver::gui(path),
        (Some(path), false) => Driver::headless(path),
        (None, true) => gui_default(platform_is_mac),
        (None, false) => {
            let candidate = Path::new(TERMINAL_VIM);
            if probe(candidate).suitable_for_headless() {
                Driver::headless(candidate)
            } else {
                gui_default(platform_is_mac)
            }
        }
    }
}

fn gui_default(platform_is_mac: bool) -> Driver {
    if platform_is_mac {
        Driver::gui(GUI_VIM_MAC)
    } else {
        Driver::gui(GUI_VIM)
    }
}

/// Choose a driver for the current system.
pub fn select_driver(explicit: Option<&Path>, gui_requested: bool) -> Driver {
    let driver = choose_driver(
        explicit,
        gui_requested,
        cfg!(target_os = "macos"),
        probe::probe,
    );
    debug!(
        event = "core.platform.driver_selected",
        driver = %driver,
        explicit = explicit.is_some(),
        gui_requested = gui_requested
    );
    driver
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn probing(features: VimFeatures) -> impl Fn(&Path) -> VimFeatures {
        move |_| features
    }

    const FULL: VimFeatures = VimFeatures {
        client_server: true,
        xterm_clipboard: true,
    };

    #[test]
    fn test_explicit_path_with_gui_is_honored() {
        let driver = choose_driver(
            Some(Path::new("/opt/vim/bin/vim")),
            true,
            false,
            probing(VimFeatures::none()),
        );
        assert_eq!(driver, Driver::gui("/opt/vim/bin/vim"));
    }

    #[test]
    fn test_explicit_path_without_gui_is_honored() {
        let driver = choose_driver(
            Some(Path::new("/opt/vim/bin/vim")),
            false,
            false,
            probing(VimFeatures::none()),
        );
        assert_eq!(driver, Driver::headless("/opt/vim/bin/vim"));
    }

    #[test]
    fn test_explicit_path_skips_probing() {
        let probed = Cell::new(false);
        let _ = choose_driver(Some(Path::new("vim")), false, false, |_| {
            probed.set(true);
            VimFeatures::none()
        });
        assert!(!probed.get());
    }

    #[test]
    fn test_gui_request_uses_platform_default() {
        let driver = choose_driver(None, true, false, probing(FULL));
        assert_eq!(driver, Driver::gui("gvim"));

        let driver = choose_driver(None, true, true, probing(FULL));
        assert_eq!(driver, Driver::gui("mvim"));
    }

    #[test]
    fn test_capable_terminal_vim_is_chosen_headless() {
        let driver = choose_driver(None, false, false, probing(FULL));
        assert_eq!(driver, Driver::headless("vim"));
    }

    #[test]
    fn test_incapable_terminal_vim_falls_back_to_gui() {
        let missing_clipboard = VimFeatures {
            client_server: true,
            xterm_clipboard: false,
        };
        let driver = choose_driver(None, false, false, probing(missing_clipboard));
        assert_eq!(driver, Driver::gui("gvim"));

        let missing_remote = VimFeatures {
            client_server: false,
            xterm_clipboard: true,
        };
        let driver = choose_driver(None, false, true, probing(missing_remote));
        assert_eq!(driver, Driver::gui("mvim"));
    }

    #[test]
    fn test_uninvocable_terminal_vim_falls_back_to_gui() {
        let driver = choose_driver(None, false, false, probing(VimFeatures::none()));
        assert_eq!(driver, Driver::gui("gvim"));
    }
}
