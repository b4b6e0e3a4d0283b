//! Wire types exchanged with the backend.
//!
//! Everything here is a plain, request-scoped view model: created when a
//! response is decoded, held by whichever screen asked for it, and dropped on
//! the next fetch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One article as the backend describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEntry {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    /// Canonical URL, doubles as the article's identity.
    pub link: String,
    /// Unix seconds.
    #[serde(default)]
    pub publication_date: Option<i64>,
}

/// An article together with the publication that carries it.
///
/// The same story can show up several times in one feed, once per source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSourceEntry {
    pub article: ArticleEntry,
    pub source: String,
}

/// Pointer to another source's coverage of the same story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarArticleEntry {
    pub source: String,
    pub link: String,
}

/// Server-defined category name.
pub type Label = String;

// ---------------------------------------------------------------------------
// Payloads (the contents of an envelope's `data`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ArticlesPayload {
    pub articles: Vec<ArticleSourceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarPayload {
    pub articles: Vec<SimilarArticleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelsPayload {
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesPayload {
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedsPayload {
    pub feeds: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminStatusPayload {
    pub admin: bool,
}

/// Payload of endpoints that answer with an empty `data` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Empty {}

// ---------------------------------------------------------------------------
// Feed query
// ---------------------------------------------------------------------------

/// Feed ordering, decided by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Recency,
    Popularity,
    Source,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Recency, SortBy::Popularity, SortBy::Source];

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Recency => "recency",
            SortBy::Popularity => "popularity",
            SortBy::Source => "source",
        }
    }

    /// The next ordering, wrapping around.
    pub fn next(self) -> Self {
        match self {
            SortBy::Recency => SortBy::Popularity,
            SortBy::Popularity => SortBy::Source,
            SortBy::Source => SortBy::Recency,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order `{0}` (expected recency, popularity or source)")]
pub struct UnknownSortBy(String);

impl FromStr for SortBy {
    type Err = UnknownSortBy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSortBy(s.to_string()))
    }
}

/// Query string of `GET /article/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedQuery {
    pub amount: u32,
    pub offset: u32,
    /// Empty means "no filter".
    pub label: Label,
    #[serde(rename = "sortBy")]
    pub sort_by: SortBy,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            amount: DEFAULT_PAGE_SIZE,
            offset: 0,
            label: Label::new(),
            sort_by: SortBy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /rss/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFeed {
    /// Name of the source publication.
    pub name: String,
    /// RSS feed URL.
    pub feed: String,
    pub category: String,
    /// Scrape interval in seconds, server default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FeedList<'a> {
    pub feeds: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Username<'a> {
    pub username: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Usernames<'a> {
    pub usernames: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct HistoryEntry<'a> {
    #[serde(rename = "articleLink")]
    pub article_link: &'a str,
}
