mod agents;
mod cli;
mod config;
mod error;
mod github;
mod gradle;
mod marketplace;
mod remote;
mod report;
mod store;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var("VDU_VERBOSE", "1");
        }
    }

    let result = match cli.command {
        Commands::Update { no_git, no_pr } => workflow::execute_update(&cli.path, no_git, no_pr),
        Commands::Check => workflow::execute_check(&cli.path),
        Commands::List => workflow::execute_list(&cli.path),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
