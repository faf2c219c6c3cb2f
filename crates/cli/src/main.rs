use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mazeprobe_kernel::Position;
use mazeprobe_kernel::message::Think;

mod commands;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "mazeprobe",
    about = "Ask a language model for the next move in a grid maze",
    version,
    long_version = LONG_VERSION
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a prompt for one position and ask the model for a move
    Run {
        /// Maze name (looked up as <maze_dir>/<name>.txt) or path to a maze file
        #[arg(long, short = 'z')]
        maze: String,

        /// Prompt strategy name (see `mazeprobe strategies`)
        #[arg(long, short)]
        strategy: String,

        /// Current position as x,y
        #[arg(long, short, allow_hyphen_values = true)]
        position: Position,

        /// Model as provider/model (defaults to the configured model)
        #[arg(long, short)]
        model: Option<String>,

        /// Reasoning setting: true, false, low, medium or high
        #[arg(long, short)]
        think: Option<Think>,

        /// Include the shortest path from the start as movement history
        #[arg(long, short = 'H')]
        history: bool,

        /// Print the prompt and response schema without calling the model
        #[arg(long)]
        dry_run: bool,

        /// Directory holding .mazeprobe/config.yaml and the maze directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// List registered prompt strategies
    Strategies,

    /// Show a parsed maze, legal moves and the shortest path to a position
    Inspect {
        /// Maze name or path to a maze file
        #[arg(long, short = 'z')]
        maze: String,

        /// Position to inspect as x,y (defaults to the goal)
        #[arg(long, short, allow_hyphen_values = true)]
        position: Option<Position>,

        /// Directory holding .mazeprobe/config.yaml and the maze directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            maze,
            strategy,
            position,
            model,
            think,
            history,
            dry_run,
            root,
            verbose,
        } => {
            commands::setup_logging(verbose);
            commands::run::execute(commands::run::RunArgs {
                maze,
                strategy,
                position,
                model,
                think,
                history,
                dry_run,
                root,
            })
            .await
        }
        Commands::Strategies => commands::strategies::execute(),
        Commands::Inspect {
            maze,
            position,
            root,
        } => {
            commands::setup_logging(false);
            commands::inspect::execute(&root, &maze, position)
        }
        Commands::Version => commands::version::execute(),
    }
}
