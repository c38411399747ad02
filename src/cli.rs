//! Command-line interface definitions for the news digest emailer.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials and the news API key are read from environment variables,
//! fetched once at startup.

use crate::endpoint::DEFAULT_TOPIC;
use clap::Parser;

/// Command-line arguments for the news digest emailer.
///
/// Passing `--endpoint` overrides endpoint construction entirely, making
/// `--topic` and `NEWS_API_KEY` irrelevant for that run.
///
/// # Examples
///
/// ```sh
/// # Default topic ("tesla"), 20 articles
/// news_digest_email
///
/// # A specific topic, 5 articles
/// news_digest_email -t climate -n 5
///
/// # Full endpoint override
/// news_digest_email -e "https://newsapi.org/v2/everything?q=ai&apiKey=..."
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Full endpoint URL to request API data from (overrides --topic)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Topic of news to be sent
    #[arg(short, long, default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Number of articles to be emailed
    #[arg(short, long = "number_articles", default_value_t = 20)]
    pub number_articles: usize,

    /// Gmail address used as both sender and receiver
    #[arg(long, env = "GMAIL_USERNAME", hide_env_values = true)]
    pub gmail_username: String,

    /// Password for the sender Gmail account
    #[arg(long, env = "GMAIL_PASSWORD", hide_env_values = true)]
    pub gmail_password: String,

    /// API key for the news API (required unless --endpoint is given)
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,
}
