//! reelstack CLI binary.
//!
//! This binary provides command-line access to the feed backend:
//! - Serve the HTTP API
//! - Run one fetch cycle for a feed
//! - Print the leaderboard

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, print_leaderboard, run_fetch, run_serve};

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { addr, config } => {
            run_serve(addr, config.as_deref()).await?;
        }
        Commands::Fetch {
            feed,
            prompt,
            limit,
            config,
        } => {
            run_fetch(feed, prompt, limit, config.as_deref()).await?;
        }
        Commands::Leaderboard { mode, limit } => {
            print_leaderboard(mode, limit).await?;
        }
    }

    Ok(())
}
