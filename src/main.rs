use clap::Parser;
use pipeboard::cli::commands::Cli;
use pipeboard::cli::handlers;
use pipeboard::logging;

fn main() {
    let cli = Cli::parse();

    let result = if cli.command.is_none() {
        // No subcommand → launch TUI
        handlers::run_tui(&cli)
    } else {
        logging::init_stderr();
        handlers::dispatch(cli)
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
