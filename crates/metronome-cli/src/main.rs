//! metronome - a terminal metronome.
//!
//! Clicks on every beat, accents the first beat of each measure and prints
//! a running beat counter until Enter is pressed.
//!
//! ```text
//! metronome <beats_per_measure> <bpm>
//! ```

mod args;
mod session;

use args::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(e),
    };

    // Logs go to stderr so they never interleave with the beat display
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    match session::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print a clap error and pick the exit code.
///
/// `--help` and `--version` are reported through the error path too but are
/// not failures. Everything else exits with status 1.
fn usage_exit(err: clap::Error) -> ExitCode {
    if !err.use_stderr() {
        let _ = err.print();
        return ExitCode::SUCCESS;
    }
    eprint!("{}", usage_error_text(&err));
    ExitCode::FAILURE
}

/// The clap message followed by the example invocation
fn usage_error_text(err: &clap::Error) -> String {
    let mut text = err.render().to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(args::EXAMPLE);
    text.push('\n');
    text
}
