//! Full-lifecycle tests against stub executables.
//!
//! A real Vim is not required: each test materializes a small shell script
//! into a temp sandbox that speaks just enough of the command-line remote
//! protocol (`--serverlist`, `--remote-send`, `--remote-expr`, and the spawn
//! flags) to exercise start, connect, remote calls and kill end to end.
//! Spawned instances append their name to a per-sandbox registry file, which
//! doubles as the serverlist.

#![cfg(unix)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use vimpilot_core::errors::VimpilotError;
use vimpilot_core::{Driver, Server, ServerConfig, ServerError};

const STUB: &str = r#"#!/bin/sh
dir="$(cd "$(dirname "$0")" && pwd)"
reg="$dir/registry"
name=""
spawn=0
prev=""
for arg in "$@"; do
  case "$prev" in
    --servername) name="$arg" ;;
    --remote-expr)
      if [ -f "$dir/expr_output" ]; then cat "$dir/expr_output"; fi
      exit 0
      ;;
  esac
  case "$arg" in
    --serverlist)
      if [ -f "$reg" ]; then cat "$reg"; fi
      exit 0
      ;;
    --noplugin) spawn=1 ;;
  esac
  prev="$arg"
done
if [ "$spawn" = 1 ] && [ -n "$name" ] && [ ! -f "$dir/mute" ]; then
  printf '%s\n' "$name" >> "$reg"
fi
if [ "$spawn" = 1 ]; then
  exec sleep 30
fi
exit 0
"#;

struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("vim-stub");
        fs::write(&stub, STUB).unwrap();

        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&stub, perms).unwrap();

        Self { dir }
    }

    fn driver(&self) -> Driver {
        Driver::headless(self.stub_path())
    }

    fn stub_path(&self) -> PathBuf {
        self.dir.path().join("vim-stub")
    }

    /// Pre-list instance names, simulating servers started elsewhere.
    fn seed_registry(&self, names: &[&str]) {
        let joined: String = names.iter().map(|n| format!("{n}\n")).collect();
        fs::write(self.dir.path().join("registry"), joined).unwrap();
    }

    /// Fix the text the stub returns for every --remote-expr call.
    fn set_expr_output(&self, output: &str) {
        fs::write(self.dir.path().join("expr_output"), output).unwrap();
    }

    /// Make spawned instances fail to register, so readiness never succeeds.
    fn mute_registration(&self) {
        fs::write(self.dir.path().join("mute"), "").unwrap();
    }
}

fn fast_config() -> ServerConfig {
    ServerConfig {
        readiness_timeout: Duration::from_secs(3),
        poll_interval: Duration::from_millis(25),
    }
}

fn short_wait() -> Option<Duration> {
    Some(Duration::from_millis(100))
}

#[test]
fn test_start_makes_the_name_discoverable() {
    let sandbox = Sandbox::new();
    let mut client = Server::with_name(sandbox.driver(), "pilot")
        .with_config(fast_config())
        .start()
        .unwrap();

    assert_eq!(client.server().name(), "PILOT");
    assert!(client.server().pid().is_some());
    assert!(client.serverlist().unwrap().contains(&"PILOT".to_string()));
    assert!(client.is_running());

    assert!(client.kill());
    assert!(!client.kill(), "second kill finds nothing to own");
}

#[test]
fn test_two_instances_are_independent() {
    let sandbox = Sandbox::new();
    let mut first = Server::with_name(sandbox.driver(), "first")
        .with_config(fast_config())
        .start()
        .unwrap();
    let mut second = Server::with_name(sandbox.driver(), "second")
        .with_config(fast_config())
        .start()
        .unwrap();

    let listed = first.serverlist().unwrap();
    assert!(listed.contains(&"FIRST".to_string()));
    assert!(listed.contains(&"SECOND".to_string()));
    assert_ne!(first.server().pid(), second.server().pid());

    assert!(first.kill());
    assert!(second.kill());
}

#[test]
fn test_start_skips_spawning_when_name_is_already_listed() {
    let sandbox = Sandbox::new();
    sandbox.seed_registry(&["PILOT"]);

    let mut client = Server::with_name(sandbox.driver(), "pilot")
        .with_config(fast_config())
        .start()
        .unwrap();

    assert_eq!(client.server().pid(), None, "nothing was spawned, nothing is owned");
    assert!(!client.kill());
}

#[test]
fn test_start_times_out_when_the_name_never_appears() {
    let sandbox = Sandbox::new();
    sandbox.mute_registration();

    let result = Server::with_name(sandbox.driver(), "pilot")
        .with_config(ServerConfig {
            readiness_timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(25),
        })
        .start();

    match result {
        Err(ServerError::StartupTimeout { name, .. }) => assert_eq!(name, "PILOT"),
        other => panic!("expected StartupTimeout, got {other:?}"),
    }
}

#[test]
fn test_start_fails_for_unresolvable_executable() {
    let result = Server::with_name(Driver::headless("/nonexistent/vim-stub"), "pilot").start();
    assert!(matches!(
        result,
        Err(ServerError::NoSuitableExecutable { .. })
    ));
}

#[test]
fn test_start_scoped_kills_on_normal_exit() {
    let sandbox = Sandbox::new();
    let driver = sandbox.driver();

    let pid = Server::with_name(driver.clone(), "scoped")
        .with_config(fast_config())
        .start_scoped(|client| client.server().pid().unwrap())
        .unwrap();

    // The process was signaled and reaped inside the scope guard, so the pid
    // no longer exists to receive a signal.
    assert!(!driver.kill(pid));
}

#[test]
fn test_start_scoped_propagates_the_closure_result() {
    let sandbox = Sandbox::new();
    let doubled = Server::with_name(sandbox.driver(), "scoped")
        .with_config(fast_config())
        .start_scoped(|_| 21 * 2)
        .unwrap();
    assert_eq!(doubled, 42);
}

#[test]
fn test_connect_finds_a_listed_instance() {
    let sandbox = Sandbox::new();
    sandbox.seed_registry(&["ALPHA"]);

    let mut client = Server::with_name(sandbox.driver(), "alpha")
        .connect(short_wait())
        .expect("instance is listed");

    assert!(client.is_running());
    assert!(!client.kill(), "a connected client owns no process");
}

#[test]
fn test_connect_missing_instance_returns_none() {
    let sandbox = Sandbox::new();
    let client = Server::with_name(sandbox.driver(), "ghost").connect(short_wait());
    assert!(client.is_none());
}

#[test]
fn test_connect_strict_missing_instance_is_an_error() {
    let sandbox = Sandbox::new();
    let result = Server::with_name(sandbox.driver(), "ghost").connect_strict(short_wait());

    match result {
        Err(ServerError::StartupTimeout { name, .. }) => assert_eq!(name, "GHOST"),
        other => panic!("expected StartupTimeout, got {other:?}"),
    }
}

#[test]
fn test_serverlist_splits_lines() {
    let sandbox = Sandbox::new();
    sandbox.seed_registry(&["ALPHA", "BETA"]);

    let server = Server::with_name(sandbox.driver(), "alpha");
    assert_eq!(server.serverlist().unwrap(), vec!["ALPHA", "BETA"]);
}

#[test]
fn test_remote_expr_preserves_raw_output() {
    let sandbox = Sandbox::new();
    sandbox.seed_registry(&["ALPHA"]);
    sandbox.set_expr_output("  two spaces each side  \n");

    let client = Server::with_name(sandbox.driver(), "alpha")
        .connect(short_wait())
        .unwrap();

    let raw = client.remote_expr("getline(1)").unwrap();
    assert_eq!(raw, "  two spaces each side  \n");
}

#[test]
fn test_command_trims_what_remote_expr_preserves() {
    let sandbox = Sandbox::new();
    sandbox.seed_registry(&["ALPHA"]);
    sandbox.set_expr_output("\n3 lines written\n");

    let client = Server::with_name(sandbox.driver(), "alpha")
        .connect(short_wait())
        .unwrap();

    assert_eq!(client.command("write").unwrap(), "3 lines written");
}

#[test]
fn test_vim_error_text_surfaces_as_invalid_command() {
    let sandbox = Sandbox::new();
    sandbox.seed_registry(&["ALPHA"]);
    sandbox.set_expr_output("Vim:E492: Not an editor command: Frobnicate\n");

    let client = Server::with_name(sandbox.driver(), "alpha")
        .connect(short_wait())
        .unwrap();

    match client.command("Frobnicate") {
        Err(ServerError::InvalidCommand { output }) => {
            assert!(output.contains("E492"));
        }
        other => panic!("expected InvalidCommand, got {other:?}"),
    }

    let error = client.command("Frobnicate").unwrap_err();
    assert_eq!(error.error_code(), "INVALID_COMMAND");
    assert!(error.is_user_error());
}

#[test]
fn test_remote_send_is_fire_and_forget() {
    let sandbox = Sandbox::new();
    sandbox.seed_registry(&["ALPHA"]);

    let client = Server::with_name(sandbox.driver(), "alpha")
        .connect(short_wait())
        .unwrap();

    client.remote_send("ihello<Esc>").unwrap();
    client.type_keys("ZZ").unwrap();
    client.normal("gg").unwrap();
}

#[test]
fn test_gui_spawn_is_detached_and_killable() {
    let sandbox = Sandbox::new();
    let driver = Driver::gui(sandbox.stub_path());

    let vimrc = sandbox.dir.path().join("vimrc");
    fs::write(&vimrc, "set nocompatible\n").unwrap();

    let handle = driver.spawn("PILOT", &vimrc).unwrap();
    assert!(handle.pid() > 0);
    assert!(driver.kill(handle.pid()));
}
