//! Presentation model for one article card.
//!
//! `ArticleCard` flattens an [`ArticleSourceEntry`] into exactly the fields a
//! card shows, and owns the relative-timestamp wording.  Rendering itself
//! lives in [`crate::ui`].

use chrono::{DateTime, TimeDelta, Utc};

use crate::api::ArticleSourceEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub photo: Option<&'a str>,
    pub link: &'a str,
    pub source: &'a str,
    /// `None` when the backend sent no date, or one out of range.
    pub published: Option<DateTime<Utc>>,
}

impl<'a> From<&'a ArticleSourceEntry> for ArticleCard<'a> {
    fn from(entry: &'a ArticleSourceEntry) -> Self {
        let article = &entry.article;
        Self {
            title: &article.title,
            description: article.description.as_deref().filter(|d| !d.trim().is_empty()),
            photo: article.photo.as_deref(),
            link: &article.link,
            source: &entry.source,
            published: article
                .publication_date
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

impl ArticleCard<'_> {
    /// Human wording of the article's age relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Option<String> {
        self.published.map(|published| relative_age(published, now))
    }
}

/// "just now", "5 minutes ago", … falling back to a date after a week.
pub fn relative_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);

    // Up to a minute of clock skew reads as fresh; further ahead gets a date.
    if elapsed < -TimeDelta::minutes(1) {
        return published.format("%Y-%m-%d").to_string();
    }
    if elapsed.num_minutes() < 1 {
        return "just now".into();
    }

    let (amount, unit) = if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 7 {
        (elapsed.num_days(), "day")
    } else {
        return published.format("%Y-%m-%d").to_string();
    };

    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}
