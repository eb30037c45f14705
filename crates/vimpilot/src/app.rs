use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    root_command()
        .subcommand(list_command())
        .subcommand(exec_command())
        .subcommand(send_command())
        .subcommand(expr_command())
        .subcommand(command_command())
        .subcommand(quit_command())
}

fn root_command() -> Command {
    Command::new("vimpilot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Control a Vim instance over its command-line remote protocol")
        .long_about(
            "vimpilot starts Vim as a named server process and drives it remotely: \
             keystroke injection, expression evaluation and Ex commands with captured \
             output. Point it at a running instance with --server, or let `exec` spin \
             up a throwaway instance for the duration of one invocation.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("vim")
                .long("vim")
                .value_name("PATH")
                .help("Use a specific Vim executable instead of probing for one")
                .global(true),
        )
        .arg(
            Arg::new("gui")
                .long("gui")
                .help("Prefer a GUI Vim (gvim/mvim) over a terminal one")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}

fn list_command() -> Command {
    Command::new("list").about("List the names of running Vim servers")
}

fn exec_command() -> Command {
    Command::new("exec")
        .about("Start a throwaway instance, run Ex commands in it, print their output")
        .arg(
            Arg::new("commands")
                .value_name("COMMAND")
                .help("Ex commands to execute, in order")
                .num_args(1..)
                .required(true),
        )
}

fn send_command() -> Command {
    Command::new("send")
        .about("Send keystrokes to a running instance")
        .arg(server_arg())
        .arg(
            Arg::new("keys")
                .value_name("KEYS")
                .help("Key sequence in Vim notation, e.g. 'ihello<Esc>'")
                .required(true),
        )
}

fn expr_command() -> Command {
    Command::new("expr")
        .about("Evaluate an expression in a running instance and print the result")
        .arg(server_arg())
        .arg(
            Arg::new("expression")
                .value_name("EXPR")
                .help("Vim expression, e.g. 'line(\"$\")'")
                .required(true),
        )
}

fn command_command() -> Command {
    Command::new("command")
        .about("Run an Ex command in a running instance and print its output")
        .arg(server_arg())
        .arg(
            Arg::new("command")
                .value_name("COMMAND")
                .help("Ex command, e.g. 'set filetype?'")
                .required(true),
        )
}

fn quit_command() -> Command {
    Command::new("quit")
        .about("Ask a running instance to save and exit")
        .arg(server_arg())
}

fn server_arg() -> Arg {
    Arg::new("server")
        .long("server")
        .short('s')
        .value_name("NAME")
        .help("Name of the target instance, as shown by `vimpilot list`")
        .required(true)
}
