use std::process::ExitCode;

use clap::Parser;
use log::error;
use tech_digest::{init_logging, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_level.into(), cli.log_file.as_deref()) {
        eprintln!("Failed to set up logging: {e:?}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}
