use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "verdant")]
#[command(about = "Verdant CLI - AI-assisted plant disease identification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a plant image for diseases
    Analyze {
        /// Path to the image file (jpeg, png, webp or gif)
        image: PathBuf,
        /// Override the model name for this run
        #[arg(long)]
        model: Option<String>,
    },
    /// Inspect the saved analysis history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved analyses
    List,
    /// Delete all saved analyses
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("verdant=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { image, model } => commands::analyze::run(&image, model).await?,
        Commands::History { action } => match action {
            HistoryAction::List => commands::history::list().await?,
            HistoryAction::Clear => commands::history::clear().await?,
        },
    }

    Ok(())
}
