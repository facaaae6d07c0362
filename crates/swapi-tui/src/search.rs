//! Searcher: runs at most one entity search at a time.
//!
//! Each search is a tokio task paired with a `CancellationToken`. Starting a
//! new search cancels the previous token and aborts its task. Replies travel
//! back over an mpsc channel and carry their token, so a reply that was
//! already queued when its search got cancelled is recognisably stale.

use std::sync::Arc;

use swapi_proto::{Entity, EntitySource, SwapiError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::form::SearchRequest;

pub struct SearchReply {
    pub request: SearchRequest,
    pub result: Result<Vec<Entity>, SwapiError>,
    token: CancellationToken,
}

impl SearchReply {
    /// False once a newer search has started (or the searcher was dropped).
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }
}

struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct Searcher<S> {
    source: Arc<S>,
    reply_tx: mpsc::Sender<SearchReply>,
    current: Option<InFlight>,
}

impl<S: EntitySource> Searcher<S> {
    pub fn new(source: Arc<S>) -> (Self, mpsc::Receiver<SearchReply>) {
        let (reply_tx, reply_rx) = mpsc::channel(16);
        let searcher = Self {
            source,
            reply_tx,
            current: None,
        };
        (searcher, reply_rx)
    }

    /// Start `request`, abandoning whatever is still in flight.
    pub fn start(&mut self, request: SearchRequest) {
        self.cancel();

        let token = CancellationToken::new();
        let task_token = token.clone();
        let source = Arc::clone(&self.source);
        let tx = self.reply_tx.clone();

        debug!("[search] start {} {:?}", request.kind, request.term);
        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                _ = task_token.cancelled() => return,
                r = source.search(request.kind, &request.term) => r,
            };
            let _ = tx
                .send(SearchReply {
                    request,
                    result,
                    token: task_token,
                })
                .await;
        });

        self.current = Some(InFlight { token, handle });
    }

    /// Take the request/result out of a reply if it belongs to the live search.
    pub fn accept(
        &mut self,
        reply: SearchReply,
    ) -> Option<(SearchRequest, Result<Vec<Entity>, SwapiError>)> {
        if !reply.is_live() {
            debug!("[search] dropping stale reply for {:?}", reply.request.term);
            return None;
        }
        self.current = None;
        Some((reply.request, reply.result))
    }
}

impl<S> Searcher<S> {
    pub fn is_pending(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|f| !f.handle.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.current.take() {
            in_flight.token.cancel();
            in_flight.handle.abort();
        }
    }
}

impl<S> Drop for Searcher<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
