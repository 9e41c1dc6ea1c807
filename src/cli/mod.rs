//! Command-line interface for salesboard.

mod commands;

use clap::{Parser, Subcommand};

/// Salesboard - product transaction dashboard backend
#[derive(Parser)]
#[command(name = "salesboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Import the seed feed into the database
    #[command(alias = "initialize")]
    Seed,

    /// Print statistics and chart data for a month
    #[command(alias = "s")]
    Summary {
        /// Month number, 1-12
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Restrict to a single year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
