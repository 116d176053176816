mod cli;
mod commands;
mod grid;
mod lunar;
mod model;
mod scroll;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let options = commands::Options::from_args(&args);
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Tui => commands::tui(options),
        cli::Command::Print { year } => commands::print_year(year, options),
    }
}
