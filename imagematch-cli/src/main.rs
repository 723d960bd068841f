//! ImageMatch CLI - find visually similar images from the terminal.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use imagematch_core::{SortKey, Theme};
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  65  File rejected (not an image, or 10 MB or larger)
  66  Input not found (missing file, no active search session)
  69  Similarity service unavailable
  74  Session storage I/O error";

#[derive(Parser)]
#[command(name = "imagematch")]
#[command(author, version, about = "Find visually similar images", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Base URL of the similarity service
    #[arg(long, global = true, env = "IMAGEMATCH_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Directory holding the search session between commands
    #[arg(long, global = true, env = "IMAGEMATCH_SESSION_DIR")]
    pub session_dir: Option<PathBuf>,

    /// Colour theme for output
    #[arg(long, global = true, default_value = "dark")]
    pub theme: Theme,

    /// Suppress result output (exit code only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

fn category_help() -> String {
    format!(
        "Only show matches in this category ({}, ...)",
        imagematch_core::category_options().join(", ")
    )
}

/// Filter/sort flags for the results view.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    #[arg(short, long, default_value = "all", help = category_help())]
    pub category: String,

    /// Order of the matches
    #[arg(short, long, default_value = "similarity")]
    pub sort: SortKey,

    /// Write the matched images into this directory
    #[arg(long, value_name = "DIR")]
    pub save_images: Option<PathBuf>,

    /// Print the results page as JSON instead of cards
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and show similar images
    Search {
        /// Path to the image to search with
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Use a canned local response instead of the similarity service (for testing)
        #[arg(long)]
        mock: bool,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show the results of the last search again
    Results {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Forget the current search session
    Reset,

    /// Ask the similarity service to index its image folder
    Index,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = run(cli).await;

    let exit = match &result {
        Ok(()) => ExitCode::success(),
        Err(err) => ExitCode::from_anyhow(err),
    };
    if let Some(message) = &exit.message {
        eprintln!("Error: {message}");
    }
    std::process::exit(exit.code);
}

async fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Search { file, mock, view } => {
            commands::search::execute(&global, file, mock, view).await
        }
        Commands::Results { view } => commands::results::execute(&global, view),
        Commands::Reset => commands::reset::execute(&global),
        Commands::Index => commands::index::execute(&global).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
