//! Background network work.
//!
//! The UI thread never waits on the network.  It hands [`Effect`]s to the
//! [`Fetcher`], which runs each one as a task on the tokio runtime and sends
//! the outcome back over an [`mpsc`] channel that the main loop drains on
//! every tick.
//!
//! ## For contributors
//!
//! Tasks are independent: similar-article lookups for different cards race
//! freely and may finish in any order.  Ordering between feed fetches is not
//! the worker's concern; the feed state machine discards stale results by
//! generation.  If the receiver has gone away (the UI exited) results are
//! silently dropped.

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::api::{ApiResult, ArticleSourceEntry, Label, NewsApi, SimilarArticleEntry};
use crate::app::Effect;
use crate::forms::AuthMode;
use crate::session::SessionStatus;

/// Messages sent from background tasks to the UI thread.
#[derive(Debug)]
pub enum FetchMsg {
    Feed {
        generation: u64,
        result: ApiResult<Vec<ArticleSourceEntry>>,
    },
    Similar {
        generation: u64,
        link: String,
        result: ApiResult<Vec<SimilarArticleEntry>>,
    },
    Labels(ApiResult<Vec<Label>>),
    Auth {
        mode: AuthMode,
        result: ApiResult<()>,
    },
    Session(SessionStatus),
}

#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn NewsApi>,
    runtime: Handle,
    tx: mpsc::Sender<FetchMsg>,
}

impl Fetcher {
    /// Create a fetcher spawning onto `runtime`.
    ///
    /// Returns the receiver the main loop should drain on every tick.
    pub fn new(api: Arc<dyn NewsApi>, runtime: Handle) -> (Self, mpsc::Receiver<FetchMsg>) {
        let (tx, rx) = mpsc::channel();
        (Self { api, runtime, tx }, rx)
    }

    /// Start the work described by `effect`.
    pub fn dispatch(&self, effect: Effect) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        match effect {
            Effect::Feed(request) => {
                self.runtime.spawn(async move {
                    tracing::debug!(generation = request.generation, query = ?request.query, "fetching feed");
                    let result = api.articles(&request.query).await;
                    send(&tx, FetchMsg::Feed {
                        generation: request.generation,
                        result,
                    });
                });
            }
            Effect::Similar(request) => {
                self.runtime.spawn(async move {
                    let result = api.similar_articles(&request.link).await;
                    send(&tx, FetchMsg::Similar {
                        generation: request.generation,
                        link: request.link,
                        result,
                    });
                });
            }
            Effect::Labels => {
                self.runtime.spawn(async move {
                    send(&tx, FetchMsg::Labels(api.labels().await));
                });
            }
            Effect::Authenticate { mode, credentials } => {
                self.runtime.spawn(async move {
                    let result = match mode {
                        AuthMode::Login => api.login(&credentials).await,
                        AuthMode::Register => api.register(&credentials).await,
                    };
                    send(&tx, FetchMsg::Auth { mode, result });
                });
            }
            Effect::Logout => {
                api.logout();
                self.spawn_session_query(api, tx);
            }
            Effect::RefreshSession => self.spawn_session_query(api, tx),
            Effect::RecordHistory(link) => {
                // Best effort: nobody waits for this and failures only get logged.
                self.runtime.spawn(async move {
                    if let Err(e) = api.record_history(&link).await {
                        tracing::warn!(link, error = %e, "could not record article view");
                    }
                });
            }
        }
    }

    fn spawn_session_query(&self, api: Arc<dyn NewsApi>, tx: mpsc::Sender<FetchMsg>) {
        self.runtime.spawn(async move {
            let status = SessionStatus::query(api.as_ref()).await;
            send(&tx, FetchMsg::Session(status));
        });
    }
}

fn send(tx: &mpsc::Sender<FetchMsg>, msg: FetchMsg) {
    // If the receiver is gone the UI has exited; nothing left to update.
    if tx.send(msg).is_err() {
        tracing::debug!("UI gone, dropping fetch result");
    }
}
