//! CLI command definitions.

use clap::{Parser, Subcommand};
use reelstack_core::LeaderboardMode;
use std::net::SocketAddr;
use std::path::PathBuf;
use uuid::Uuid;

/// reelstack - prompt-driven short-video feed backend
#[derive(Parser, Debug)]
#[command(name = "reelstack")]
#[command(about = "Prompt-driven short-video feed backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,

        /// Path to a sources TOML config (defaults to environment variables)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run one fetch cycle for a feed
    Fetch {
        /// Feed id
        feed: Uuid,

        /// Prompt override (defaults to the feed's own prompt)
        #[arg(long)]
        prompt: Option<String>,

        /// Candidate cap per provider
        #[arg(long, default_value = "8")]
        limit: usize,

        /// Path to a sources TOML config (defaults to environment variables)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the leaderboard
    Leaderboard {
        /// Ranking mode: daily or total
        #[arg(long, default_value = "daily")]
        mode: LeaderboardMode,

        /// Page size
        #[arg(long)]
        limit: Option<i64>,
    },
}
