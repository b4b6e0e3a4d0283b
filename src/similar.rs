//! Lazily loaded "other sources covering this story" disclosures.
//!
//! Each article card asks for its similar coverage the first time it is on
//! screen.  Lookups run independently of each other and of the feed; a
//! failure only ever affects the one card that asked.

use std::collections::HashMap;

use crate::api::{FetchError, SimilarArticleEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disclosure {
    Pending,
    Loaded(Vec<SimilarArticleEntry>),
    /// The lookup failed.  Rendered exactly like an empty result.
    Unavailable,
}

impl Disclosure {
    /// Entries to show; empty while pending or unavailable.
    pub fn entries(&self) -> &[SimilarArticleEntry] {
        match self {
            Disclosure::Loaded(entries) => entries,
            _ => &[],
        }
    }
}

/// One lookup the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarRequest {
    /// Feed generation the article belongs to.
    pub generation: u64,
    pub link: String,
}

/// Disclosure state of every article on the current feed page.
#[derive(Debug, Default)]
pub struct SimilarArticles {
    generation: u64,
    disclosures: HashMap<String, Disclosure>,
}

impl SimilarArticles {
    /// Forget everything and start tracking the page of feed `generation`.
    pub fn reset(&mut self, generation: u64) {
        self.generation = generation;
        self.disclosures.clear();
    }

    /// Mark `links` as pending and return a request for each one not seen yet.
    pub fn request<'a>(&mut self, links: impl IntoIterator<Item = &'a str>) -> Vec<SimilarRequest> {
        let mut requests = Vec::new();
        for link in links {
            if self.disclosures.contains_key(link) {
                continue;
            }
            self.disclosures.insert(link.to_string(), Disclosure::Pending);
            requests.push(SimilarRequest {
                generation: self.generation,
                link: link.to_string(),
            });
        }
        requests
    }

    /// Store the outcome of a lookup; results for an older page are dropped.
    pub fn commit(
        &mut self,
        generation: u64,
        link: &str,
        result: Result<Vec<SimilarArticleEntry>, FetchError>,
    ) {
        if generation != self.generation {
            tracing::debug!(link, "dropping similar articles for a previous page");
            return;
        }
        let disclosure = match result {
            Ok(entries) => Disclosure::Loaded(entries),
            Err(e) => {
                tracing::warn!(link, error = %e, "similar article lookup failed");
                Disclosure::Unavailable
            }
        };
        self.disclosures.insert(link.to_string(), disclosure);
    }

    pub fn get(&self, link: &str) -> Option<&Disclosure> {
        self.disclosures.get(link)
    }
}

/// Group entries by source, keeping the order sources first appear in.
pub fn group_by_source(entries: &[SimilarArticleEntry]) -> Vec<(&str, Vec<&str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|(source, _)| *source == entry.source) {
            Some((_, links)) => links.push(entry.link.as_str()),
            None => groups.push((entry.source.as_str(), vec![entry.link.as_str()])),
        }
    }
    groups
}
