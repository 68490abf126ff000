//! Command-line interface module.

mod commands;
mod runtime;

pub use commands::{Cli, Commands};
pub use runtime::{print_leaderboard, run_fetch, run_serve};
