//! Per-session state and the async driver that talks to the backend.

pub mod history;
pub mod log;
pub mod state;

pub use history::{QueryHistory, DEFAULT_HISTORY_CAPACITY};
pub use log::ConversationLog;
pub use state::{PendingQuery, SessionState};

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::QueryApi;
use crate::types::{Message, QueryRequest};

/// Notifications for front-ends that redraw incrementally.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    MessageAppended(Message),
    LoadingChanged(bool),
    HistorySeeded(usize),
    Cleared,
}

/// Drives a [`SessionState`] against a [`QueryApi`].
///
/// Submissions are not serialized: each one runs as its own task and its
/// result is applied whenever it finishes. The state lock is never held across
/// an await.
#[derive(Clone)]
pub struct Session {
    api: Arc<dyn QueryApi>,
    state: Arc<Mutex<SessionState>>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl Session {
    pub fn new(api: Arc<dyn QueryApi>, state: SessionState) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(state)),
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock()
    }

    /// Fetch the server-side history and seed the session with it.
    ///
    /// A failed fetch is logged and leaves the history empty.
    pub async fn load_history(&self) -> bool {
        match self.api.history().await {
            Ok(entries) => {
                let count = entries.len();
                let seeded = self.state.lock().seed_history(entries);
                if seeded {
                    tracing::info!(count, "Seeded query history");
                    self.emit(SessionEvent::HistorySeeded(count));
                }
                seeded
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch query history");
                false
            }
        }
    }

    /// Submit the current input. Returns `None` for blank input.
    pub fn submit(&self) -> Option<JoinHandle<()>> {
        let (pending, user_message) = {
            let mut state = self.state.lock();
            let pending = state.submit()?;
            (pending, state.log().last().cloned())
        };
        Some(self.dispatch(pending, user_message))
    }

    /// Submit `text` directly, e.g. a clicked suggestion.
    pub fn submit_text(&self, text: &str) -> Option<JoinHandle<()>> {
        let (pending, user_message) = {
            let mut state = self.state.lock();
            let pending = state.submit_text(text)?;
            (pending, state.log().last().cloned())
        };
        Some(self.dispatch(pending, user_message))
    }

    pub fn clear(&self) {
        self.state.lock().clear_conversation();
        self.emit(SessionEvent::Cleared);
    }

    fn dispatch(&self, pending: PendingQuery, user_message: Option<Message>) -> JoinHandle<()> {
        if let Some(message) = user_message {
            self.emit(SessionEvent::MessageAppended(message));
        }
        self.emit(SessionEvent::LoadingChanged(true));

        let session = self.clone();
        tokio::spawn(async move {
            tracing::info!(query_id = %pending.id, query = %pending.query, "Submitting query");

            let request = QueryRequest {
                query: pending.query.clone(),
            };
            let outcome = session.api.query(&request).await;

            let (message, loading) = {
                let mut state = session.state.lock();
                let message = state.complete(&pending, outcome).clone();
                (message, state.is_loading())
            };

            session.emit(SessionEvent::MessageAppended(message));
            session.emit(SessionEvent::LoadingChanged(loading));
        })
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is listening any more.
            let _ = events.send(event);
        }
    }
}
