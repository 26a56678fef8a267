mod brokers;
mod convert;
mod detect;

use std::path::Path;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Convert(args) => convert::run(args, cli.pretty).await,
        Command::Detect(args) => detect::run(args, cli.pretty),
        Command::Brokers => brokers::run(cli.pretty),
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}
