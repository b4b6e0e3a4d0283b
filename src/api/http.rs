//! HTTP implementation of [`NewsApi`] on top of [`reqwest`].
//!
//! Sessions are cookie based: the client keeps a cookie jar, login stores the
//! `session` cookie the server sets, logout expires it locally.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::envelope::decode;
use super::model::{
    AdminStatusPayload, ArticlesPayload, Empty, FeedList, FeedsPayload, HistoryEntry,
    LabelsPayload, SimilarPayload, SourcesPayload, Username, Usernames,
};
use super::{
    ApiResult, ArticleSourceEntry, Credentials, FeedQuery, Label, NewFeed, NewsApi,
    SimilarArticleEntry,
};

const SESSION_COOKIE: &str = "session";
const NO_QUERY: &[(&str, &str)] = &[];

pub struct HttpNewsApi {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl HttpNewsApi {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` — scheme, host and port of the backend (e.g.
    ///   `http://localhost:5000`).  A trailing slash is ignored.
    /// * `timeout` — applied to every request, connect included.
    pub fn new(base_url: Url, timeout: Duration) -> ApiResult<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            jar,
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        let origin = self.base_url.as_str().trim_end_matches('/');
        format!("{origin}{path}")
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let result = decode(status, &body);

        match &result {
            Ok(_) => tracing::debug!(status, "request succeeded"),
            Err(e) => tracing::warn!(status, error = %e, "request failed"),
        }
        result
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        tracing::debug!(path, "GET");
        let request = self.client.get(self.url(path)).query(query);
        self.execute(request).await
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(%method, path, "sending");
        let request = self.client.request(method, self.url(path)).json(body);
        self.execute(request).await
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn articles(&self, query: &FeedQuery) -> ApiResult<Vec<ArticleSourceEntry>> {
        let payload: ArticlesPayload = self.get("/article/", query).await?;
        Ok(payload.articles)
    }

    async fn similar_articles(&self, article_link: &str) -> ApiResult<Vec<SimilarArticleEntry>> {
        let payload: SimilarPayload = self
            .get("/article/similar", &[("url", article_link)])
            .await?;
        Ok(payload.articles)
    }

    async fn labels(&self) -> ApiResult<Vec<Label>> {
        let payload: LabelsPayload = self.get("/labels/", NO_QUERY).await?;
        Ok(payload.labels)
    }

    async fn sources(&self) -> ApiResult<Vec<String>> {
        let payload: SourcesPayload = self.get("/source/", NO_QUERY).await?;
        Ok(payload.sources)
    }

    async fn feeds(&self, source: &str) -> ApiResult<Vec<String>> {
        let payload: FeedsPayload = self.get("/rss/", &[("source", source)]).await?;
        Ok(payload.feeds)
    }

    async fn add_feed(&self, feed: &NewFeed) -> ApiResult<()> {
        let _: Empty = self.send(Method::POST, "/rss/", feed).await?;
        Ok(())
    }

    async fn remove_feeds(&self, feeds: &[String]) -> ApiResult<()> {
        let _: Empty = self
            .send(Method::DELETE, "/rss/", &FeedList { feeds })
            .await?;
        Ok(())
    }

    async fn register(&self, credentials: &Credentials) -> ApiResult<()> {
        let _: Empty = self.send(Method::POST, "/user/", credentials).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<()> {
        let _: Empty = self
            .send(Method::POST, "/user/login/", credentials)
            .await?;
        Ok(())
    }

    fn logout(&self) {
        // An already-expired cookie replaces, and thereby drops, the live one.
        self.jar.add_cookie_str(
            &format!("{SESSION_COOKIE}=; Max-Age=0; Path=/"),
            &self.base_url,
        );
    }

    fn has_session(&self) -> bool {
        self.jar
            .cookies(&self.base_url)
            .and_then(|header| header.to_str().ok().map(has_session_cookie))
            .unwrap_or(false)
    }

    async fn delete_user(&self, username: &str) -> ApiResult<()> {
        let _: Empty = self
            .send(Method::DELETE, "/user/", &Username { username })
            .await?;
        Ok(())
    }

    async fn admin_status(&self) -> ApiResult<bool> {
        let payload: AdminStatusPayload = self.get("/admin/", NO_QUERY).await?;
        Ok(payload.admin)
    }

    async fn grant_admin(&self, usernames: &[String]) -> ApiResult<()> {
        let _: Empty = self
            .send(Method::POST, "/admin/", &Usernames { usernames })
            .await?;
        Ok(())
    }

    async fn record_history(&self, article_link: &str) -> ApiResult<()> {
        let _: Empty = self
            .send(Method::POST, "/user-history/", &HistoryEntry { article_link })
            .await?;
        Ok(())
    }
}

/// Look for a non-empty `session` pair in a `Cookie` header value.
fn has_session_cookie(header: &str) -> bool {
    header.split(';').any(|pair| {
        pair.trim()
            .split_once('=')
            .is_some_and(|(name, value)| name == SESSION_COOKIE && !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchError, SortBy};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn api() -> HttpNewsApi {
        let url = Url::parse("http://localhost:5000").unwrap();
        HttpNewsApi::new(url, Duration::from_secs(1)).unwrap()
    }

    /// One canned HTTP answer.
    struct Reply {
        status: u16,
        headers: &'static str,
        body: String,
    }

    impl Reply {
        fn ok(data: Value) -> Self {
            Self {
                status: 200,
                headers: "",
                body: json!({"data": data, "errors": [], "status": 200}).to_string(),
            }
        }
    }

    /// What the client sent for one request.
    struct Seen {
        request_line: String,
        head: String,
        body: String,
    }

    impl Seen {
        fn json(&self) -> Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    /// Serve `replies` in order, one connection each, and hand back what
    /// was received.
    async fn serve(replies: Vec<Reply>) -> (HttpNewsApi, JoinHandle<Vec<Seen>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();

        let server = tokio::spawn(async move {
            let mut seen = Vec::new();
            for reply in replies {
                let (mut stream, _) = listener.accept().await.unwrap();
                seen.push(read_request(&mut stream).await);
                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
                    reply.status,
                    reply.body.len(),
                    reply.headers,
                    reply.body
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            seen
        });

        let api = HttpNewsApi::new(base, Duration::from_secs(5)).unwrap();
        (api, server)
    }

    async fn read_request(stream: &mut TcpStream) -> Seen {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-request");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }

        Seen {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8(buf[head_end..head_end + length].to_vec()).unwrap(),
            head: head.to_ascii_lowercase(),
        }
    }

    fn article(title: &str, link: &str, source: &str) -> Value {
        json!({"article": {"title": title, "link": link}, "source": source})
    }

    #[tokio::test]
    async fn feed_query_uses_wire_names_and_keeps_server_order() {
        let (api, server) = serve(vec![Reply::ok(json!({"articles": [
            article("C", "http://x/3", "hln"),
            article("A", "http://x/1", "vrt"),
            article("B", "http://x/2", "nos"),
        ]}))])
        .await;

        let query = FeedQuery {
            offset: 50,
            sort_by: SortBy::Popularity,
            ..FeedQuery::default()
        };
        let articles = api.articles(&query).await.unwrap();

        let titles: Vec<&str> = articles.iter().map(|e| e.article.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);

        let seen = server.await.unwrap();
        assert_eq!(
            seen[0].request_line,
            "GET /article/?amount=50&offset=50&label=&sortBy=popularity HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn similar_lookup_sends_the_article_link_as_url() {
        let (api, server) = serve(vec![Reply::ok(json!({"articles": [
            {"source": "nos", "link": "http://nos/1"}
        ]}))])
        .await;

        let similar = api.similar_articles("http://x/1?a=b").await.unwrap();
        assert_eq!(similar[0].source, "nos");

        let seen = server.await.unwrap();
        assert_eq!(
            seen[0].request_line,
            "GET /article/similar?url=http%3A%2F%2Fx%2F1%3Fa%3Db HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn write_endpoints_send_camel_case_json_bodies() {
        let (api, server) = serve(vec![
            Reply::ok(json!({})),
            Reply::ok(json!({})),
            Reply::ok(json!({})),
        ])
        .await;

        api.record_history("http://x/1").await.unwrap();
        api.grant_admin(&["alice".into(), "bob".into()]).await.unwrap();
        api.remove_feeds(&["http://vrt.be/rss".into()]).await.unwrap();

        let seen = server.await.unwrap();
        assert_eq!(seen[0].request_line, "POST /user-history/ HTTP/1.1");
        assert_eq!(seen[0].json(), json!({"articleLink": "http://x/1"}));
        assert_eq!(seen[1].request_line, "POST /admin/ HTTP/1.1");
        assert_eq!(seen[1].json(), json!({"usernames": ["alice", "bob"]}));
        assert_eq!(seen[2].request_line, "DELETE /rss/ HTTP/1.1");
        assert_eq!(seen[2].json(), json!({"feeds": ["http://vrt.be/rss"]}));
        assert!(seen[0].head.contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn login_cookie_is_kept_and_sent_back() {
        let (api, server) = serve(vec![
            Reply {
                headers: "Set-Cookie: session=abc123; Path=/; HttpOnly\r\n",
                ..Reply::ok(json!({}))
            },
            Reply::ok(json!({"admin": true})),
        ])
        .await;

        assert!(!api.has_session());
        api.login(&Credentials {
            username: "alice".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
        assert!(api.has_session());
        assert!(api.admin_status().await.unwrap());

        let seen = server.await.unwrap();
        assert_eq!(seen[0].request_line, "POST /user/login/ HTTP/1.1");
        assert_eq!(seen[0].json(), json!({"username": "alice", "password": "pw"}));
        assert!(seen[1].head.contains("cookie: session=abc123"));

        api.logout();
        assert!(!api.has_session());
    }

    #[tokio::test]
    async fn bodiless_conflict_keeps_its_status() {
        let (api, server) = serve(vec![Reply {
            status: 409,
            headers: "",
            body: String::new(),
        }])
        .await;

        let err = api
            .register(&Credentials {
                username: "alice".into(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Application { status: 409, .. }));
        server.await.unwrap();
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let api = api();
        assert_eq!(api.url("/article/"), "http://localhost:5000/article/");
    }

    #[test]
    fn session_cookie_is_detected_among_others() {
        assert!(has_session_cookie("theme=dark; session=abc123"));
        assert!(has_session_cookie("session=abc123"));
        assert!(!has_session_cookie("theme=dark"));
        assert!(!has_session_cookie("session="));
        assert!(!has_session_cookie("sessionid=abc"));
    }

    #[test]
    fn fresh_client_has_no_session() {
        assert!(!api().has_session());
    }

    #[test]
    fn stored_cookie_counts_as_session_until_logout() {
        let api = api();
        api.jar
            .add_cookie_str("session=abc123; Path=/", &api.base_url);
        assert!(api.has_session());

        api.logout();
        assert!(!api.has_session());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        // Port 9 (discard) is closed on any sane test machine.
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let api = HttpNewsApi::new(url, Duration::from_secs(2)).unwrap();

        let err = api.labels().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
