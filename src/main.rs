mod changelog;
mod extract;
mod transcript;

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Extract the final result text and a file changelog from an assistant
/// run's JSON output.
///
/// Exactly three arguments, all taken as paths: there are no flags, so
/// `--help` or a path starting with `-` is never treated as an option.
#[derive(Parser)]
#[command(name = "transcript-changelog", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// JSON transcript produced by the run
    #[arg(allow_hyphen_values = true)]
    raw_json: PathBuf,
    /// Destination for the final result text
    #[arg(allow_hyphen_values = true)]
    result_out: PathBuf,
    /// Destination for the changelog
    #[arg(allow_hyphen_values = true)]
    changelog_out: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    init_logging();

    if let Err(err) = extract::run(&cli.raw_json, &cli.result_out, &cli.changelog_out) {
        eprintln!("transcript-changelog: {err:#}");
        process::exit(1);
    }
}
