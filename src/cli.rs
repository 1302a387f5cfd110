use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cinescope")]
#[command(author, version, about = "Movie discovery service backed by TMDB")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (and static front end, if configured)
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Browse movies from the terminal
    Browse {
        /// Title keyword to search for
        #[arg(short, long)]
        search: Option<String>,

        /// Only movies released in this year
        #[arg(short, long)]
        year: Option<i32>,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Shared query string (e.g. "search=heat&releaseYear=1995&page=2")
        #[arg(long)]
        url: Option<String>,

        /// Prefetched first page (JSON, e.g. saved from /api/movies) for the unfiltered listing
        #[arg(long)]
        initial_page: Option<PathBuf>,

        /// Read filter commands from stdin
        #[arg(short, long)]
        interactive: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
