use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lunacal", version, about = "Scrolling solar/lunar terminal calendar")]
pub struct Cli {
    /// Years to load on each side of the current year
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    pub span: u32,
    /// Preload a wide range (100 years either side) up front
    #[arg(long)]
    pub all: bool,
    /// Hide the Chinese lunar annotations
    #[arg(long)]
    pub no_lunar: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the scrolling calendar TUI
    Tui,
    /// Print month grids for one year to stdout
    Print {
        /// Year to print (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
}
