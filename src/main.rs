use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::List(args) => commands::list::run(&cli, args),
        Commands::Render(args) => commands::render::run(&cli, args),
    }
}
