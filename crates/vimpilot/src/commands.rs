use std::path::Path;
use std::time::Duration;

use clap::ArgMatches;
use tracing::info;

use vimpilot_core::{Client, Server, ServerError, platform};

/// How long the name-targeting subcommands wait for their instance to show
/// up in the serverlist. These target instances that should already be
/// running, so the wait is short.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

pub fn run_command(matches: &ArgMatches) -> Result<(), ServerError> {
    match matches.subcommand() {
        Some(("list", sub)) => handle_list(sub),
        Some(("exec", sub)) => handle_exec(sub),
        Some(("send", sub)) => handle_send(sub),
        Some(("expr", sub)) => handle_expr(sub),
        Some(("command", sub)) => handle_command(sub),
        Some(("quit", sub)) => handle_quit(sub),
        _ => unreachable!("subcommand_required is set"),
    }
}

fn selected_driver(matches: &ArgMatches) -> vimpilot_core::Driver {
    let explicit = matches.get_one::<String>("vim").map(Path::new);
    platform::select_driver(explicit, matches.get_flag("gui"))
}

fn handle_list(matches: &ArgMatches) -> Result<(), ServerError> {
    let server = Server::new(selected_driver(matches));
    match server.serverlist() {
        Ok(names) => {
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: failed to query the serverlist: {e}");
            Err(e)
        }
    }
}

fn handle_exec(matches: &ArgMatches) -> Result<(), ServerError> {
    let commands: Vec<String> = matches
        .get_many::<String>("commands")
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let result = Server::new(selected_driver(matches)).start_scoped(|client| {
        for command in &commands {
            let output = client.command(command)?;
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Ok(())
    });

    match result {
        Ok(inner) => {
            if let Err(ref e) = inner {
                eprintln!("Error: {e}");
            }
            inner
        }
        Err(e) => {
            eprintln!("Error: failed to start Vim: {e}");
            Err(e)
        }
    }
}

fn handle_send(matches: &ArgMatches) -> Result<(), ServerError> {
    let keys = required(matches, "keys");
    let client = attach(matches)?;
    if let Err(e) = client.remote_send(keys) {
        eprintln!("Error: failed to send keys: {e}");
        return Err(e);
    }
    Ok(())
}

fn handle_expr(matches: &ArgMatches) -> Result<(), ServerError> {
    let expression = required(matches, "expression");
    let client = attach(matches)?;
    match client.remote_expr(expression) {
        Ok(result) => {
            print!("{result}");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Err(e)
        }
    }
}

fn handle_command(matches: &ArgMatches) -> Result<(), ServerError> {
    let command = required(matches, "command");
    let client = attach(matches)?;
    match client.command(command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Err(e)
        }
    }
}

fn handle_quit(matches: &ArgMatches) -> Result<(), ServerError> {
    let client = attach(matches)?;
    if let Err(e) = client.quit() {
        eprintln!("Error: failed to quit the instance: {e}");
        return Err(e);
    }
    info!(event = "cli.quit_sent", server = client.server().name());
    Ok(())
}

/// Connect to the instance named by --server, with a short discovery wait.
fn attach(matches: &ArgMatches) -> Result<Client, ServerError> {
    let name = required(matches, "server");
    let server = Server::with_name(selected_driver(matches), name);
    server.connect_strict(Some(CONNECT_TIMEOUT)).map_err(|e| {
        eprintln!(
            "Error: no running instance named '{}'. `vimpilot list` shows what is running.",
            name.to_uppercase()
        );
        e
    })
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}
