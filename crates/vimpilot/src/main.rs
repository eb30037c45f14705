use vimpilot_core::init_logging;

mod app;
mod commands;

fn main() {
    let app = app::build_cli();
    let matches = app.get_matches();

    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    if let Err(e) = commands::run_command(&matches) {
        // Error already printed to the user via eprintln! in the handlers;
        // exit non-zero without repeating it as a Debug dump.
        drop(e);
        std::process::exit(1);
    }
}
