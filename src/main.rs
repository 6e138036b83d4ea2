use std::process::ExitCode;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    let command_line_interface = tilekit::cli::CommandLineInterface::load();
    match command_line_interface.run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

/// Log filter comes from `TILEKIT_LOG` (e.g. `tilekit=debug`), defaulting to warnings.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TILEKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
