//! Command-line interface for Trackarr.

mod commands;

use clap::{Parser, Subcommand};

/// Trackarr - Personal Media Tracker
/// Tracks books, movies and shows, with upcoming-episode alerts
#[derive(Parser)]
#[command(name = "trackarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web API with the background refresh scheduler
    #[command(alias = "daemon")]
    Serve,

    /// Refresh upcoming-episode data for tracked shows
    Refresh {
        /// Refresh every refreshable show regardless of staleness
        #[arg(long)]
        force: bool,
    },

    /// Search providers without adding anything
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Restrict results to one media type (book, movie or show)
        #[arg(long = "type")]
        media_type: Option<String>,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
