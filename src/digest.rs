//! Article digest formatting.
//!
//! This module holds the core of the pipeline: validating the raw JSON feed
//! returned by the news API and rendering it into the plain-text digest that
//! gets emailed. The feed is checked explicitly at this boundary rather than
//! deserialized into structs, so that a missing key, a wrong container type,
//! and a wrong field type each surface as their own [`DigestError`].
//!
//! # Expected feed shape
//!
//! ```json
//! {
//!     "articles": [
//!         {
//!             "title": "Breaking News",
//!             "description": "This is the latest news update.",
//!             "url": "https://example.com/breaking",
//!             ...
//!         },
//!         ...
//!     ],
//!     ...
//! }
//! ```
//!
//! Extra keys at either level are ignored. Aggregated news APIs sometimes
//! return stub articles where `title`, `description`, and `url` are all
//! null; those are skipped without erroring. Any other non-string field is
//! treated as corruption and fails the whole call.

use crate::error::DigestError;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// Format the first `limit` articles of a feed into a plain-text digest.
///
/// Each qualifying article renders as a 1-based indexed block:
///
/// ```text
/// [1]
/// Title: <title>
/// Description: <description>
/// Link: <url>
/// ```
///
/// Blocks are separated by a blank line and the result is trimmed of
/// trailing whitespace. Entry order matches feed order. A `limit` of 0
/// yields an empty digest, as does a feed whose first `limit` articles are
/// all stubs; an empty digest means "nothing to send" and is not an error.
///
/// # Arguments
///
/// * `feed` - The decoded JSON payload from the news API
/// * `limit` - Maximum number of articles to include
///
/// # Errors
///
/// Fails with a shape error if `articles` is missing or not an array, if an
/// element is not an object, or if an element lacks any of `title`,
/// `description`, `url`; fails with [`DigestError::FieldNotAString`] if any
/// of those fields is neither a string nor part of the all-null stub case.
/// The first offending article aborts the whole call.
#[instrument(level = "info", skip(feed))]
pub fn format_digest(feed: &Value, limit: usize) -> Result<String, DigestError> {
    info!("Generating digest of article titles, descriptions, and urls");

    let articles = match feed.get("articles") {
        None => {
            error!("Feed has no 'articles' key");
            return Err(DigestError::MissingArticlesKey);
        }
        Some(value) => value.as_array().ok_or_else(|| {
            error!("Feed 'articles' value is not an array");
            DigestError::ArticlesNotAnArray
        })?,
    };

    let mut digest = String::new();
    for (i, article) in articles.iter().take(limit).enumerate() {
        let record = article.as_object().ok_or_else(|| {
            error!(index = i, "Article is not an object");
            DigestError::ArticleNotAnObject(i)
        })?;

        let (Some(title), Some(description), Some(url)) = (
            record.get("title"),
            record.get("description"),
            record.get("url"),
        ) else {
            error!(index = i, "Article is missing a required key");
            return Err(DigestError::MissingArticleField(i));
        };

        // Stub articles carry an explicit null in all three fields.
        if title.is_null() && description.is_null() && url.is_null() {
            debug!(index = i, "Skipping stub article with all-null fields");
            continue;
        }

        match (title.as_str(), description.as_str(), url.as_str()) {
            (Some(title), Some(description), Some(url)) => {
                digest.push_str(&format!(
                    "[{}]\nTitle: {}\nDescription: {}\nLink: {}\n\n",
                    i + 1,
                    title,
                    description,
                    url
                ));
            }
            _ => {
                error!(index = i, "Article field is not a string");
                return Err(DigestError::FieldNotAString(i));
            }
        }
    }

    let digest = digest.trim_end().to_string();
    info!(bytes = digest.len(), "Generated digest");
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_article_feed() -> Value {
        json!({
            "articles": [
                {"title": "T1", "description": "D1", "url": "http://x"},
                {"title": "T2", "description": "D2", "url": "http://y"}
            ]
        })
    }

    #[test]
    fn test_format_two_articles_exact_output() {
        let out = format_digest(&two_article_feed(), 20).unwrap();
        assert_eq!(
            out,
            "[1]\nTitle: T1\nDescription: D1\nLink: http://x\n\n[2]\nTitle: T2\nDescription: D2\nLink: http://y"
        );
    }

    #[test]
    fn test_empty_feed_is_shape_error() {
        let err = format_digest(&json!({}), 20).unwrap_err();
        assert_eq!(err, DigestError::MissingArticlesKey);
        assert!(err.is_shape());
    }

    #[test]
    fn test_articles_not_an_array_is_shape_error() {
        let err = format_digest(&json!({"articles": "nope"}), 20).unwrap_err();
        assert_eq!(err, DigestError::ArticlesNotAnArray);
        assert!(err.is_shape());
    }

    #[test]
    fn test_limit_truncates_to_first_article() {
        let out = format_digest(&two_article_feed(), 1).unwrap();
        assert!(out.contains("Title: T1"));
        assert!(!out.contains("Title: T2"));
    }

    #[test]
    fn test_limit_zero_yields_empty_digest() {
        let out = format_digest(&two_article_feed(), 0).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_shorter_feed_than_limit_is_valid() {
        let out = format_digest(&two_article_feed(), 100).unwrap();
        assert_eq!(out.matches("Title:").count(), 2);
    }

    #[test]
    fn test_all_null_article_is_skipped() {
        let feed = json!({
            "articles": [
                {"title": null, "description": null, "url": null},
                {"title": "T2", "description": "D2", "url": "http://y"}
            ]
        });
        let out = format_digest(&feed, 20).unwrap();
        // The stub contributes nothing; the second article keeps its
        // feed position in the rendered index.
        assert_eq!(out, "[2]\nTitle: T2\nDescription: D2\nLink: http://y");
    }

    #[test]
    fn test_feed_of_only_stubs_yields_empty_digest() {
        let feed = json!({
            "articles": [{"title": null, "description": null, "url": null}]
        });
        assert_eq!(format_digest(&feed, 20).unwrap(), "");
    }

    #[test]
    fn test_missing_key_fails_regardless_of_position() {
        let feed = json!({
            "articles": [
                {"title": "T1", "description": "D1", "url": "http://x"},
                {"title": "T2", "description": "D2"}
            ]
        });
        let err = format_digest(&feed, 20).unwrap_err();
        assert_eq!(err, DigestError::MissingArticleField(1));
        assert!(err.is_shape());
    }

    #[test]
    fn test_article_not_an_object_is_shape_error() {
        let feed = json!({"articles": ["just a string"]});
        let err = format_digest(&feed, 20).unwrap_err();
        assert_eq!(err, DigestError::ArticleNotAnObject(0));
    }

    #[test]
    fn test_mixed_null_and_string_is_type_error() {
        let feed = json!({
            "articles": [{"title": "T1", "description": null, "url": "http://x"}]
        });
        let err = format_digest(&feed, 20).unwrap_err();
        assert_eq!(err, DigestError::FieldNotAString(0));
        assert!(!err.is_shape());
    }

    #[test]
    fn test_non_string_field_is_type_error() {
        let feed = json!({
            "articles": [{"title": 42, "description": "D1", "url": "http://x"}]
        });
        assert_eq!(
            format_digest(&feed, 20).unwrap_err(),
            DigestError::FieldNotAString(0)
        );
    }

    #[test]
    fn test_fail_fast_aborts_whole_call() {
        // A bad article early in the list fails the call even though a
        // later article is fine.
        let feed = json!({
            "articles": [
                {"title": 42, "description": "D1", "url": "http://x"},
                {"title": "T2", "description": "D2", "url": "http://y"}
            ]
        });
        assert!(format_digest(&feed, 20).is_err());
    }

    #[test]
    fn test_articles_beyond_limit_are_never_inspected() {
        // The corrupt article sits past the limit, so it is never touched.
        let feed = json!({
            "articles": [
                {"title": "T1", "description": "D1", "url": "http://x"},
                {"title": 42, "description": "D2", "url": "http://y"}
            ]
        });
        let out = format_digest(&feed, 1).unwrap();
        assert_eq!(out, "[1]\nTitle: T1\nDescription: D1\nLink: http://x");
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let feed = json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [
                {
                    "title": "T1",
                    "description": "D1",
                    "url": "http://x",
                    "author": "someone",
                    "publishedAt": "2025-02-06T00:00:00Z"
                }
            ]
        });
        let out = format_digest(&feed, 20).unwrap();
        assert_eq!(out, "[1]\nTitle: T1\nDescription: D1\nLink: http://x");
    }

    #[test]
    fn test_format_is_idempotent() {
        let feed = two_article_feed();
        let first = format_digest(&feed, 20).unwrap();
        let second = format_digest(&feed, 20).unwrap();
        assert_eq!(first, second);
    }
}
