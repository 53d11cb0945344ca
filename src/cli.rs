use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "vdu",
    about = "Vendor Dependency Updater - keeps WPILib and vendordep versions current",
    version,
    author
)]
pub struct Cli {
    /// Path to the robot project directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply available updates, commit them, and open or refresh the PR
    Update {
        /// Skip Git operations (don't create a branch or commit)
        #[arg(long)]
        no_git: bool,

        /// Skip the pull-request step (commit and push only)
        #[arg(long)]
        no_pr: bool,
    },

    /// Check for available updates without modifying any files
    Check,

    /// List the vendordep descriptors in the project
    List,
}
