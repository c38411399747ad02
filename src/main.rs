//! # News Digest Email
//!
//! A glue pipeline that fetches news articles from a JSON HTTP API, formats
//! a plain-text digest of titles, descriptions, and links, and emails the
//! digest over SMTP with implicit TLS.
//!
//! ## Usage
//!
//! ```sh
//! export GMAIL_USERNAME=you@gmail.com
//! export GMAIL_PASSWORD=app-password
//! export NEWS_API_KEY=...
//! news_digest_email -t climate -n 10
//! ```
//!
//! ## Architecture
//!
//! One linear run with no retries and no persistence:
//! 1. **Endpoint**: build the query URL from topic + API key (or take the
//!    `--endpoint` override verbatim)
//! 2. **Fetch**: one GET, decoded as JSON
//! 3. **Format**: validate the feed shape and render the digest
//! 4. **Email**: if the digest is non-empty, compose and send it; an empty
//!    digest ends the run successfully without contacting the SMTP server

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod digest;
mod email;
mod endpoint;
mod error;
mod fetch;
mod utils;

use cli::Cli;
use error::ConfigError;

const SUBJECT: &str = "Daily news email";
const BASE_MESSAGE: &str = "To whom it may concern,\n\n Please find below the titles and descriptions of articles from the news that are of interest to you:\n\n";

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    run(Cli::parse()).await
}

/// The whole pipeline for one run. Both terminal success states (email sent,
/// nothing to send) fall through to the elapsed-time log at the end.
async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();
    info!("news_digest_email starting up");
    debug!(
        ?args.endpoint,
        topic = %args.topic,
        number_articles = args.number_articles,
        "Parsed CLI arguments"
    );

    // ---- Resolve endpoint ----
    let endpoint_url = match args.endpoint {
        Some(url) => {
            info!("Using endpoint override from CLI");
            url
        }
        None => {
            let api_key = args.news_api_key.as_deref().ok_or_else(|| {
                error!("No --endpoint given and NEWS_API_KEY is not set");
                ConfigError::MissingApiKey
            })?;
            endpoint::news_api_endpoint(api_key, &args.topic)
        }
    };

    // ---- Fetch and format ----
    let feed = fetch::fetch_feed(&endpoint_url, fetch::default_headers()).await?;
    let digest = digest::format_digest(&feed, args.number_articles)?;

    // ---- Email ----
    if digest.is_empty() {
        info!("No news articles to send in email");
    } else {
        info!("Sending news articles email");
        let body = format!("{BASE_MESSAGE}{digest}");
        let message =
            email::compose_message(SUBJECT, &args.gmail_username, &args.gmail_username, &body)?;
        email::send_message(
            &args.gmail_username,
            &args.gmail_password,
            message,
            email::DEFAULT_SMTP_HOST,
            email::DEFAULT_SMTP_PORT,
        )
        .await?;
        info!("Sent news articles email");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::capture::LogCapture;
    use tracing::instrument::WithSubscriber;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args_with_endpoint(url: &str) -> Cli {
        Cli {
            endpoint: Some(url.to_string()),
            topic: "tesla".to_string(),
            number_articles: 20,
            gmail_username: "user@example.com".to_string(),
            gmail_password: "hunter2".to_string(),
            news_api_key: None,
        }
    }

    #[tokio::test]
    async fn test_empty_feed_run_succeeds_without_email_and_logs_elapsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"articles": []})),
            )
            .mount(&server)
            .await;

        let capture = LogCapture::default();
        run(args_with_endpoint(&server.uri()))
            .with_subscriber(capture.dispatch())
            .await
            .unwrap();

        let logs = capture.contents();
        assert!(logs.contains("No news articles to send in email"));
        // The nothing-to-send exit still reports run duration.
        assert!(logs.contains("Execution complete"));
        // The composer/sender stages were never entered.
        assert!(!logs.contains("Sending news articles email"));
    }

    #[tokio::test]
    async fn test_run_without_endpoint_or_api_key_fails() {
        let mut args = args_with_endpoint("unused");
        args.endpoint = None;
        args.news_api_key = None;

        let err = run(args).await.unwrap_err();
        assert!(err.to_string().contains("NEWS_API_KEY"));
    }
}
