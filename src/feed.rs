//! Feed view state machine.
//!
//! ```text
//!            mount / label / sort / page / reload
//!                 ┌──────────────────────────┐
//!                 ▼                          │
//!            ┌─────────┐   Err    ┌─────────┐│
//!            │ Loading │ ───────► │ Errored ││
//!            └─────────┘          └─────────┘│
//!              │     │ Ok(0)      ┌─────────┐│
//!              │     └──────────► │  Empty  ││
//!              │ Ok(n>0)          └─────────┘│
//!              │                  ┌─────────┐│
//!              └────────────────► │Populated│┘
//!                                 └─────────┘
//! ```
//!
//! Every transition into `Loading` hands out a [`FeedRequest`] stamped with a
//! fresh generation number.  A result is only committed when its generation
//! is the latest one issued, so a slow response for a filter the user has
//! already moved away from can never overwrite the current page.

use crate::api::{ArticleSourceEntry, FeedQuery, FetchError, Label, SortBy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    /// The last fetch failed.  Stays here until the user triggers a new one.
    Errored(String),
    Empty,
    Populated(Vec<ArticleSourceEntry>),
}

/// A fetch the caller must perform, then hand back to [`FeedView::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub generation: u64,
    pub query: FeedQuery,
}

#[derive(Debug)]
pub struct FeedView {
    state: FeedState,
    query: FeedQuery,
    generation: u64,
}

impl FeedView {
    pub fn new(page_size: u32, sort_by: SortBy) -> Self {
        Self {
            state: FeedState::Loading,
            query: FeedQuery {
                amount: page_size,
                sort_by,
                ..FeedQuery::default()
            },
            generation: 0,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Articles of the current page; empty unless `Populated`.
    pub fn articles(&self) -> &[ArticleSourceEntry] {
        match &self.state {
            FeedState::Populated(articles) => articles,
            _ => &[],
        }
    }

    /// Page number, starting at 1.
    pub fn page(&self) -> u32 {
        self.query.offset / self.query.amount.max(1) + 1
    }

    fn begin(&mut self) -> FeedRequest {
        self.generation += 1;
        self.state = FeedState::Loading;
        FeedRequest {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// Initial load of the view.
    pub fn mount(&mut self) -> FeedRequest {
        self.begin()
    }

    /// Re-fetch with unchanged parameters.  This is how a user leaves `Errored`.
    pub fn reload(&mut self) -> FeedRequest {
        self.begin()
    }

    /// Switch the label filter; an empty label removes the filter.
    ///
    /// Returns `None` when the label is already selected.
    pub fn set_label(&mut self, label: Label) -> Option<FeedRequest> {
        if self.query.label == label {
            return None;
        }
        self.query.label = label;
        self.query.offset = 0;
        Some(self.begin())
    }

    pub fn set_sort(&mut self, sort_by: SortBy) -> Option<FeedRequest> {
        if self.query.sort_by == sort_by {
            return None;
        }
        self.query.sort_by = sort_by;
        self.query.offset = 0;
        Some(self.begin())
    }

    /// Advance one page.  Only possible after a full page came back.
    pub fn next_page(&mut self) -> Option<FeedRequest> {
        let full_page = match &self.state {
            FeedState::Populated(articles) => articles.len() >= self.query.amount as usize,
            _ => false,
        };
        if !full_page {
            return None;
        }
        self.query.offset += self.query.amount;
        Some(self.begin())
    }

    pub fn previous_page(&mut self) -> Option<FeedRequest> {
        if self.query.offset == 0 {
            return None;
        }
        self.query.offset = self.query.offset.saturating_sub(self.query.amount);
        Some(self.begin())
    }

    /// Apply the outcome of the fetch stamped `generation`.
    ///
    /// Returns `false` (and leaves the state alone) for superseded fetches.
    pub fn commit(
        &mut self,
        generation: u64,
        result: Result<Vec<ArticleSourceEntry>, FetchError>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping stale feed response"
            );
            return false;
        }

        self.state = match result {
            Ok(articles) if articles.is_empty() => FeedState::Empty,
            Ok(articles) => FeedState::Populated(articles),
            Err(e) => {
                tracing::warn!(error = %e, "feed fetch failed");
                FeedState::Errored(e.to_string())
            }
        };
        true
    }
}
