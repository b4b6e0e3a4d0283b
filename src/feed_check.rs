//! Pre-flight check for feeds an admin is about to register.
//!
//! The server scrapes whatever URL it is given; a typo only shows up later
//! as a feed that never produces articles.  `admin add-feed --check` fetches
//! the URL first and refuses anything that does not parse as RSS.

use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum FeedCheckError {
    #[error("could not fetch feed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("feed URL answered with HTTP {0}")]
    Status(u16),
    #[error("not a valid RSS feed: {0}")]
    Parse(#[from] rss::Error),
}

/// One `<item>` of a checked feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// What the feed looks like to a reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPreview {
    pub title: String,
    pub items: Vec<PreviewItem>,
}

impl FeedPreview {
    /// Summarise an already-parsed channel.
    pub fn from_channel(channel: &rss::Channel) -> Self {
        let items = channel
            .items()
            .iter()
            .map(|item| PreviewItem {
                title: item.title().map(String::from),
                link: item.link().map(String::from),
                // RFC-2822; unparseable dates count as missing.
                published: item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
            })
            .collect();

        Self {
            title: channel.title().to_string(),
            items,
        }
    }

    pub fn parse(body: &[u8]) -> Result<Self, FeedCheckError> {
        let channel = rss::Channel::read_from(body)?;
        Ok(Self::from_channel(&channel))
    }

    /// The most recently published item; the first item when none is dated.
    pub fn newest(&self) -> Option<&PreviewItem> {
        self.items
            .iter()
            .filter(|i| i.published.is_some())
            .max_by_key(|i| i.published)
            .or_else(|| self.items.first())
    }

    /// One-line report printed by `admin add-feed --check`.
    pub fn summary(&self) -> String {
        let mut line = format!("Feed OK: {} ({} items)", self.title, self.items.len());
        if let Some(item) = self.newest() {
            let heading = item
                .title
                .as_deref()
                .or(item.link.as_deref())
                .unwrap_or("(untitled)");
            line.push_str(&format!(", newest: {heading}"));
            if let Some(published) = item.published {
                line.push_str(&format!(" [{}]", published.format("%Y-%m-%d %H:%M")));
            }
        }
        line
    }
}

/// Download `url` and parse it as RSS.
pub async fn fetch(url: &str, timeout: Duration) -> Result<FeedPreview, FeedCheckError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedCheckError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    let preview = FeedPreview::parse(&body)?;
    tracing::debug!(url, title = %preview.title, items = preview.items.len(), "feed parsed");
    Ok(preview)
}
