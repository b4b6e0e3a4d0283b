use std::ops::Range;

use ratatui::widgets::ListState;

use crate::api::{ApiResult, ArticleSourceEntry, Credentials, Label, SortBy};
use crate::feed::{FeedRequest, FeedState, FeedView};
use crate::fetch::FetchMsg;
use crate::forms::{AuthForm, AuthMode};
use crate::session::SessionStatus;
use crate::similar::{SimilarArticles, SimilarRequest};

/// Screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Auth(AuthMode),
}

/// Work the app wants done outside the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Feed(FeedRequest),
    Similar(SimilarRequest),
    Labels,
    Authenticate {
        mode: AuthMode,
        credentials: Credentials,
    },
    Logout,
    RefreshSession,
    RecordHistory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelsState {
    Loading,
    /// Fetch failed; shown the same as "no labels".
    Unavailable,
    Loaded(Vec<Label>),
}

impl LabelsState {
    pub fn labels(&self) -> &[Label] {
        match self {
            LabelsState::Loaded(labels) => labels,
            _ => &[],
        }
    }
}

pub struct App {
    pub route: Route,
    pub feed: FeedView,
    pub similar: SimilarArticles,
    pub labels: LabelsState,
    /// Index into the label list; `None` is "All".
    pub selected_label: Option<usize>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Article indices on screen during the last draw.
    pub visible: Range<usize>,
    /// Whether the detail pane of the selected article is open.
    pub detail_open: bool,
    pub session: SessionStatus,
    pub login: AuthForm,
    pub register: AuthForm,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    effects: Vec<Effect>,
}

impl App {
    pub fn new(page_size: u32, sort_by: SortBy) -> Self {
        Self {
            route: Route::Home,
            feed: FeedView::new(page_size, sort_by),
            similar: SimilarArticles::default(),
            labels: LabelsState::Loading,
            selected_label: None,
            list_state: ListState::default(),
            visible: 0..0,
            detail_open: false,
            session: SessionStatus::default(),
            login: AuthForm::new(AuthMode::Login),
            register: AuthForm::new(AuthMode::Register),
            quit: false,
            status: "Starting…".into(),
            effects: Vec::new(),
        }
    }

    /// Mount the home view: first feed page, labels and session status.
    pub fn start(&mut self) {
        let request = self.feed.mount();
        self.begin_feed(request);
        self.effects.push(Effect::Labels);
        self.effects.push(Effect::RefreshSession);
    }

    /// Hand over everything queued since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn begin_feed(&mut self, request: FeedRequest) {
        self.similar.reset(request.generation);
        self.list_state.select(None);
        *self.list_state.offset_mut() = 0;
        self.visible = 0..0;
        self.detail_open = false;
        self.status = "Loading articles…".into();
        self.effects.push(Effect::Feed(request));
    }

    // -- background results --------------------------------------------------

    pub fn handle(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Feed { generation, result } => {
                if !self.feed.commit(generation, result) {
                    return;
                }
                self.status = match self.feed.state() {
                    FeedState::Populated(articles) => {
                        format!("Fetched {} articles", articles.len())
                    }
                    FeedState::Empty => "No articles".into(),
                    FeedState::Errored(_) => "Could not load articles".into(),
                    FeedState::Loading => "Loading articles…".into(),
                };
                self.select_first();
            }
            FetchMsg::Similar {
                generation,
                link,
                result,
            } => self.similar.commit(generation, &link, result),
            FetchMsg::Labels(result) => {
                self.labels = match result {
                    Ok(labels) => LabelsState::Loaded(labels),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not load labels");
                        LabelsState::Unavailable
                    }
                };
            }
            FetchMsg::Auth { mode, result } => self.finish_auth(mode, result),
            FetchMsg::Session(status) => self.session = status,
        }
    }

    fn finish_auth(&mut self, mode: AuthMode, result: ApiResult<()>) {
        let succeeded = self.form_mut(mode).finish(result);
        if !succeeded {
            return;
        }
        tracing::info!(?mode, "authenticated");
        self.status = match mode {
            AuthMode::Login => "Login succeeded".into(),
            AuthMode::Register => "Account created".into(),
        };
        self.effects.push(Effect::RefreshSession);
        if self.route == Route::Auth(mode) {
            self.route = Route::Home;
        }
    }

    // -- feed filters --------------------------------------------------------

    /// Label the feed is currently filtered by, empty for "All".
    pub fn current_label(&self) -> &str {
        self.selected_label
            .and_then(|i| self.labels.labels().get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Step through "All" and each label, wrapping around.
    pub fn cycle_label(&mut self, forward: bool) {
        let count = self.labels.labels().len();
        if count == 0 {
            return;
        }
        self.selected_label = match (self.selected_label, forward) {
            (None, true) => Some(0),
            (None, false) => Some(count - 1),
            (Some(i), true) if i + 1 < count => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };
        let label = self.current_label().to_string();
        if let Some(request) = self.feed.set_label(label) {
            self.begin_feed(request);
        }
    }

    pub fn cycle_sort(&mut self) {
        let next = self.feed.query().sort_by.next();
        if let Some(request) = self.feed.set_sort(next) {
            self.begin_feed(request);
        }
    }

    pub fn next_page(&mut self) {
        if let Some(request) = self.feed.next_page() {
            self.begin_feed(request);
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(request) = self.feed.previous_page() {
            self.begin_feed(request);
        }
    }

    pub fn reload(&mut self) {
        let request = self.feed.reload();
        self.begin_feed(request);
    }

    // -- similar articles ----------------------------------------------------

    /// Queue lookups for every on-screen card that has not asked yet.
    pub fn request_visible_similar(&mut self) {
        let articles = self.feed.articles();
        let end = self.visible.end.min(articles.len());
        let start = self.visible.start.min(end);
        let links = articles[start..end].iter().map(|e| e.article.link.as_str());

        let requests = self.similar.request(links);
        self.effects
            .extend(requests.into_iter().map(Effect::Similar));
    }

    // -- articles ------------------------------------------------------------

    pub fn selected_article(&self) -> Option<&ArticleSourceEntry> {
        self.list_state
            .selected()
            .and_then(|i| self.feed.articles().get(i))
    }

    /// Show the selected article in full and note the view in the user's
    /// history.
    pub fn open_selected(&mut self) {
        let Some(link) = self.selected_article().map(|e| e.article.link.clone()) else {
            return;
        };
        self.detail_open = true;
        if self.session.logged_in {
            self.effects.push(Effect::RecordHistory(link));
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.feed.articles().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.feed.articles().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.feed.articles().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.feed.articles().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    // -- routes and session --------------------------------------------------

    /// Switch screens.  Auth screens are unavailable while logged in.
    pub fn goto(&mut self, route: Route) {
        if matches!(route, Route::Auth(_)) && self.session.logged_in {
            self.status = "Already logged in".into();
            return;
        }
        self.route = route;
    }

    pub fn form_mut(&mut self, mode: AuthMode) -> &mut AuthForm {
        match mode {
            AuthMode::Login => &mut self.login,
            AuthMode::Register => &mut self.register,
        }
    }

    pub fn form(&self, mode: AuthMode) -> &AuthForm {
        match mode {
            AuthMode::Login => &self.login,
            AuthMode::Register => &self.register,
        }
    }

    pub fn submit_form(&mut self, mode: AuthMode) {
        if let Some(credentials) = self.form_mut(mode).submit() {
            self.effects.push(Effect::Authenticate { mode, credentials });
        }
    }

    pub fn logout(&mut self) {
        if !self.session.logged_in {
            return;
        }
        self.session = SessionStatus::default();
        self.status = "Logged out".into();
        self.effects.push(Effect::Logout);
    }
}
