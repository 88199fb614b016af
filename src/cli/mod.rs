pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "estuary")]
#[command(about = "Browse ranked, aggregated article feeds", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List subscribed feeds, best first
    Feeds,
    /// Browse the aggregated article feed
    Articles {
        /// Restrict to a single feed
        #[arg(long)]
        feed: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Browse reading history
    History {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Browse articles saved for later
    Saved {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Mark an article as read
    Read {
        /// Id of the article
        article_id: String,
    },
    /// Save an article for later
    Save {
        /// Id of the article
        article_id: String,

        /// Remove the article from saved instead
        #[arg(long)]
        remove: bool,
    },
}
