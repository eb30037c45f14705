//! Materialization of the static startup script.
//!
//! Vim is started with `-u <this file> --noplugin` so every instance begins
//! from the same clean state, and so `VimpilotRunCommand` is defined inside
//! the server for command-output capture (the remote protocol only evaluates
//! expressions; it has no "run a command and give me its output" primitive).

use std::io::Write;

use tempfile::NamedTempFile;

use super::errors::ServerError;

const STARTUP_VIMRC: &str = include_str!("../../vim/vimrc");

/// Write the embedded vimrc to a temp file. The returned handle keeps the
/// file alive; the server holds it for the lifetime of the spawned process.
pub(crate) fn materialize() -> Result<NamedTempFile, ServerError> {
    let mut file = tempfile::Builder::new()
        .prefix("vimpilot-")
        .suffix(".vim")
        .tempfile()
        .map_err(|source| ServerError::VimrcWriteFailed { source })?;
    file.write_all(STARTUP_VIMRC.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| ServerError::VimrcWriteFailed { source })?;
    Ok(file)
}
