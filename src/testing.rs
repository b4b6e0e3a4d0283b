//! In-memory [`NewsApi`] used by unit tests across the crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, ApiResult, ArticleEntry, ArticleSourceEntry, Credentials, ErrorKind, FeedQuery,
    FetchError, Label, NewFeed, NewsApi, SimilarArticleEntry,
};

/// Canned answer: a payload or an application failure.
pub type Canned<T> = Result<T, (u16, Vec<ApiError>)>;

pub fn failure<T>(status: u16, kind: ErrorKind, message: &str) -> Canned<T> {
    Err((status, vec![ApiError::new(kind, message)]))
}

pub fn entry(title: &str, link: &str, source: &str) -> ArticleSourceEntry {
    ArticleSourceEntry {
        article: ArticleEntry {
            title: title.to_string(),
            description: None,
            photo: None,
            link: link.to_string(),
            publication_date: None,
        },
        source: source.to_string(),
    }
}

pub fn similar(source: &str, link: &str) -> SimilarArticleEntry {
    SimilarArticleEntry {
        source: source.to_string(),
        link: link.to_string(),
    }
}

fn answer<T: Clone>(canned: &Mutex<Canned<T>>) -> ApiResult<T> {
    canned
        .lock()
        .unwrap()
        .clone()
        .map_err(|(status, errors)| FetchError::Application { status, errors })
}

pub struct FakeApi {
    pub articles: Mutex<Canned<Vec<ArticleSourceEntry>>>,
    /// Keyed by article link; links without an entry have no similar coverage.
    pub similar: Mutex<HashMap<String, Canned<Vec<SimilarArticleEntry>>>>,
    pub labels: Mutex<Canned<Vec<Label>>>,
    pub sources: Mutex<Canned<Vec<String>>>,
    pub feeds: Mutex<Canned<Vec<String>>>,
    pub login: Mutex<Canned<()>>,
    pub register: Mutex<Canned<()>>,
    pub writes: Mutex<Canned<()>>,
    pub history: Mutex<Canned<()>>,
    pub admin: AtomicBool,
    session: AtomicBool,
    /// Every call made, in order, as a short description.
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            articles: Mutex::new(Ok(Vec::new())),
            similar: Mutex::new(HashMap::new()),
            labels: Mutex::new(Ok(Vec::new())),
            sources: Mutex::new(Ok(Vec::new())),
            feeds: Mutex::new(Ok(Vec::new())),
            login: Mutex::new(Ok(())),
            register: Mutex::new(Ok(())),
            writes: Mutex::new(Ok(())),
            history: Mutex::new(Ok(())),
            admin: AtomicBool::new(false),
            session: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NewsApi for FakeApi {
    async fn articles(&self, query: &FeedQuery) -> ApiResult<Vec<ArticleSourceEntry>> {
        self.record(format!(
            "articles amount={} offset={} label={} sortBy={}",
            query.amount, query.offset, query.label, query.sort_by
        ));
        answer(&self.articles)
    }

    async fn similar_articles(&self, article_link: &str) -> ApiResult<Vec<SimilarArticleEntry>> {
        self.record(format!("similar {article_link}"));
        let canned = self
            .similar
            .lock()
            .unwrap()
            .get(article_link)
            .cloned()
            .unwrap_or(Ok(Vec::new()));
        canned.map_err(|(status, errors)| FetchError::Application { status, errors })
    }

    async fn labels(&self) -> ApiResult<Vec<Label>> {
        self.record("labels".into());
        answer(&self.labels)
    }

    async fn sources(&self) -> ApiResult<Vec<String>> {
        self.record("sources".into());
        answer(&self.sources)
    }

    async fn feeds(&self, source: &str) -> ApiResult<Vec<String>> {
        self.record(format!("feeds {source}"));
        answer(&self.feeds)
    }

    async fn add_feed(&self, feed: &NewFeed) -> ApiResult<()> {
        self.record(format!("add_feed {} {}", feed.name, feed.feed));
        answer(&self.writes)
    }

    async fn remove_feeds(&self, feeds: &[String]) -> ApiResult<()> {
        self.record(format!("remove_feeds {}", feeds.join(",")));
        answer(&self.writes)
    }

    async fn register(&self, credentials: &Credentials) -> ApiResult<()> {
        self.record(format!("register {}", credentials.username));
        let result = answer(&self.register);
        if result.is_ok() {
            self.session.store(true, Ordering::SeqCst);
        }
        result
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<()> {
        self.record(format!("login {}", credentials.username));
        let result = answer(&self.login);
        if result.is_ok() {
            self.session.store(true, Ordering::SeqCst);
        }
        result
    }

    fn logout(&self) {
        self.record("logout".into());
        self.session.store(false, Ordering::SeqCst);
    }

    fn has_session(&self) -> bool {
        self.session.load(Ordering::SeqCst)
    }

    async fn delete_user(&self, username: &str) -> ApiResult<()> {
        self.record(format!("delete_user {username}"));
        answer(&self.writes)
    }

    async fn admin_status(&self) -> ApiResult<bool> {
        self.record("admin_status".into());
        Ok(self.has_session() && self.admin.load(Ordering::SeqCst))
    }

    async fn grant_admin(&self, usernames: &[String]) -> ApiResult<()> {
        self.record(format!("grant_admin {}", usernames.join(",")));
        answer(&self.writes)
    }

    async fn record_history(&self, article_link: &str) -> ApiResult<()> {
        self.record(format!("history {article_link}"));
        answer(&self.history)
    }
}
