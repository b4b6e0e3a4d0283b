//! Backend API abstraction layer.
//!
//! This module defines the [`NewsApi`] trait and the wire types it speaks.
//! The production implementation is [`HttpNewsApi`]; tests swap in an
//! in-memory fake so the screens and the fetch worker can be exercised
//! without a server.
//!
//! ## For contributors — adding an endpoint
//!
//! 1. Add the payload / body types to `model.rs`.
//! 2. Add a method to [`NewsApi`] below.
//! 3. Implement it in `http.rs` on top of `get` / `send`, which take care of
//!    the envelope.
//! 4. Add the method to the test fake in `crate::testing`.

mod envelope;
mod error;
mod http;
pub mod model;

pub use envelope::{decode, ApiError, ApiResponse, ErrorKind};
pub use error::FetchError;
pub use http::HttpNewsApi;
pub use model::{
    ArticleEntry, ArticleSourceEntry, Credentials, FeedQuery, Label, NewFeed,
    SimilarArticleEntry, SortBy,
};

use async_trait::async_trait;

pub type ApiResult<T> = Result<T, FetchError>;

/// Everything the front-end asks of the backend.
///
/// Implementations are shared between the UI thread and background tasks,
/// so they must be `Send + Sync`.  Session state lives inside the
/// implementation (a cookie store for HTTP); callers never handle tokens.
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// `GET /article/` — one page of the feed, in server order.
    async fn articles(&self, query: &FeedQuery) -> ApiResult<Vec<ArticleSourceEntry>>;

    /// `GET /article/similar` — other sources covering the same story.
    async fn similar_articles(&self, article_link: &str) -> ApiResult<Vec<SimilarArticleEntry>>;

    /// `GET /labels/`
    async fn labels(&self) -> ApiResult<Vec<Label>>;

    /// `GET /source/`
    async fn sources(&self) -> ApiResult<Vec<String>>;

    /// `GET /rss/` — feeds of one source.
    async fn feeds(&self, source: &str) -> ApiResult<Vec<String>>;

    /// `POST /rss/`
    async fn add_feed(&self, feed: &NewFeed) -> ApiResult<()>;

    /// `DELETE /rss/`
    async fn remove_feeds(&self, feeds: &[String]) -> ApiResult<()>;

    /// `POST /user/`
    async fn register(&self, credentials: &Credentials) -> ApiResult<()>;

    /// `POST /user/login/` — stores the session cookie on success.
    async fn login(&self, credentials: &Credentials) -> ApiResult<()>;

    /// Forget the session cookie.  Purely local.
    fn logout(&self);

    /// Whether a session cookie is currently held.
    fn has_session(&self) -> bool;

    /// `DELETE /user/`
    async fn delete_user(&self, username: &str) -> ApiResult<()>;

    /// `GET /admin/` — whether the current session belongs to an admin.
    async fn admin_status(&self) -> ApiResult<bool>;

    /// `POST /admin/`
    async fn grant_admin(&self, usernames: &[String]) -> ApiResult<()>;

    /// `POST /user-history/`
    async fn record_history(&self, article_link: &str) -> ApiResult<()>;
}
