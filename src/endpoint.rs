//! News API endpoint construction.
//!
//! Builds the query URL for the newsapi.org `everything` endpoint. The
//! parameter order is fixed: query term, date-from filter, sort order,
//! language filter, API key. Pure string composition; the API key is not
//! validated here, a bad or empty key surfaces downstream as an HTTP error
//! from the API itself.

use tracing::debug;

const BASE_URL: &str = "https://newsapi.org/v2/everything?q=";
const CONDITIONS_URL: &str = "&from=2025-02-06&sortBy=publishedAt&language=en";

/// Default news topic when none is given on the command line.
pub const DEFAULT_TOPIC: &str = "tesla";

/// Compose the fully-qualified news API URL for a topic and API key.
pub fn news_api_endpoint(api_key: &str, topic: &str) -> String {
    let endpoint = format!(
        "{}{}{}&apiKey={}",
        BASE_URL,
        urlencoding::encode(topic),
        CONDITIONS_URL,
        api_key
    );
    debug!(%endpoint, "Built news API endpoint");
    endpoint
}
