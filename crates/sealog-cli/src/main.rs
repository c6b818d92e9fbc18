//! sealog CLI - throttle, optionally encrypt, and durably store lines from stdin
//!
//! Reads lines from standard input, admits at most `--flow-speed` of them per
//! second, optionally seals each with AES-GCM under a key derived from
//! `--log-key`, and writes them to `--file-path`. SIGINT/SIGTERM flush and
//! sync the file before exiting. `--debug` reads the file back instead.

mod app;
mod cli;
mod config;
mod constants;
mod logging;
mod settings;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use crate::cli::Cli;
use crate::settings::Settings;

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "sealog", &mut std::io::stdout());
        return;
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            app::exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = config::load_config(cli.config.as_deref())?;
    logging::init_logging(&settings::log_level(&cli, &config));

    let settings = Settings::resolve(&cli, &config)?;
    if cli.debug {
        app::run_replay(&settings, cli.format)
    } else {
        app::run_ingest(&settings)
    }
}
