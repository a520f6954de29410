//! Feed fetching and parsing.
//!
//! Downloads a feed document over HTTP and parses it into a
//! [`ParsedFeed`]. Fetch failures are classified so callers can decide
//! between retrying (transient) and giving up (malformed document).

use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use thiserror::Error;

use crate::feed::types::{ItemPayload, ParsedFeed, MAX_FEED_SIZE};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total request timeout in seconds.
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = "feedpool/0.1 (RSS aggregator)";

/// Classified feed fetch failures.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The host could not be reached or answered with an error status.
    #[error("feed unreachable: {0}")]
    Unreachable(String),

    /// The request exceeded its deadline.
    #[error("feed fetch timed out")]
    Timeout,

    /// The response body exceeded the size limit.
    #[error("feed too large: {0} bytes")]
    TooLarge(u64),

    /// The body was retrieved but is not a parseable feed document.
    #[error("malformed feed: {0}")]
    Malformed(String),
}

/// Feed fetcher wrapping a shared HTTP client.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a new fetcher with default timeouts.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Unreachable(format!("http client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch and parse the feed at the given URL.
    pub async fn fetch(&self, url: &str) -> Result<ParsedFeed, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Unreachable(format!("HTTP {status}")));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_FEED_SIZE {
                return Err(FetchError::TooLarge(len));
            }
        }

        let bytes = response.bytes().await.map_err(classify_request_error)?;
        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(FetchError::TooLarge(bytes.len() as u64));
        }

        parse_feed(&bytes)
    }
}

fn classify_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Unreachable(e.to_string())
    }
}

/// Parse feed bytes into a [`ParsedFeed`].
fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, FetchError> {
    let feed = parser::parse(bytes).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled Feed".to_string());

    let items: Vec<ItemPayload> = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            let summary = entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body));
            let link = entry.links.first().map(|l| l.href.clone());
            let published = entry.published.or(entry.updated);

            ItemPayload {
                title,
                summary,
                link,
                published,
            }
        })
        .collect();

    Ok(ParsedFeed { title, items })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_rss() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <item>
      <title>First Article</title>
      <link>https://example.com/1</link>
      <description>First summary</description>
    </item>
    <item>
      <title>Second Article</title>
      <link>https://example.com/2</link>
    </item>
  </channel>
</rss>"#;

        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.title, "Test Feed");
        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].title, "First Article");
        assert_eq!(feed.items[0].summary, Some("First summary".to_string()));
        assert_eq!(
            feed.items[0].link,
            Some("https://example.com/1".to_string())
        );
        assert_eq!(feed.items[1].summary, None);
    }

    #[test]
    fn test_parse_feed_atom() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <entry>
    <id>urn:uuid:1</id>
    <title>Atom Entry</title>
    <link href="https://example.com/entry"/>
    <summary>Entry summary</summary>
    <updated>2025-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

        let feed = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(feed.title, "Atom Feed");
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].title, "Atom Entry");
        assert!(feed.items[0].published.is_some());
    }

    #[test]
    fn test_parse_feed_without_titles() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item><guid>1</guid></item>
  </channel>
</rss>"#;

        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.title, "Untitled Feed");
        assert_eq!(feed.items[0].title, "Untitled");
    }

    #[test]
    fn test_parse_feed_invalid() {
        let result = parse_feed(b"This is not XML");
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        let result = fetcher.fetch(&server.uri()).await;
        assert!(matches!(result, Err(FetchError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("not a feed"))
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        let result = fetcher.fetch(&server.uri()).await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }
}
