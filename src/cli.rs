//! Command-line arguments.
//!
//! Every global option falls back to a `NEWS_FINDER_*` environment variable,
//! which `main` may have loaded from a `.env` file first.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::SortBy;

#[derive(Debug, Parser)]
#[command(name = "news-finder")]
#[command(about = "Terminal front-end for the news-finder aggregation server", long_about = None)]
pub struct Cli {
    /// Base URL of the news-finder server
    #[arg(
        long,
        global = true,
        env = "NEWS_FINDER_SERVER_URL",
        default_value = "http://localhost:5000"
    )]
    pub server_url: String,

    /// Articles requested per feed page
    #[arg(long, global = true, env = "NEWS_FINDER_PAGE_SIZE", default_value_t = 50)]
    pub page_size: u32,

    /// Initial feed order: recency, popularity or source
    #[arg(long, global = true, env = "NEWS_FINDER_SORT", default_value = "recency")]
    pub sort: SortBy,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "NEWS_FINDER_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Where the TUI writes its log
    #[arg(long, global = true, default_value = "news-finder.log")]
    pub log_file: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the categories articles can be filtered by
    Labels,
    /// List the news sources known to the server
    Sources,
    /// List the RSS feed URLs of a source
    Feeds {
        /// Source name; omitted lists every feed
        #[arg(long, default_value = "")]
        source: String,
    },
    /// Administrative operations (require an admin account)
    Admin {
        #[command(flatten)]
        login: AdminLogin,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Args)]
pub struct AdminLogin {
    #[arg(long, env = "NEWS_FINDER_USERNAME")]
    pub username: String,

    #[arg(long, env = "NEWS_FINDER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Register a new RSS feed for a source
    AddFeed {
        /// Source name the feed belongs to
        #[arg(long)]
        name: String,
        /// Feed URL
        #[arg(long)]
        feed: String,
        /// Category articles from this feed are filed under
        #[arg(long)]
        category: String,
        /// Scrape interval in seconds
        #[arg(long)]
        interval: Option<u64>,
        /// Fetch and parse the feed before submitting it
        #[arg(long)]
        check: bool,
    },
    /// Remove one or more feeds by URL
    RemoveFeed {
        #[arg(required = true)]
        feeds: Vec<String>,
    },
    /// Delete a user account
    DeleteUser { username: String },
    /// Give admin rights to one or more users
    Grant {
        #[arg(required = true)]
        usernames: Vec<String>,
    },
}
