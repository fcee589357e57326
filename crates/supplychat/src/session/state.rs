//! Session-scoped state and the transitions the UI drives.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::history::QueryHistory;
use super::log::ConversationLog;
use crate::config::DashboardConfig;
use crate::error::ClientError;
use crate::pipeline::MessageAssembler;
use crate::render::SidebarView;
use crate::types::{Message, QueryResponse, UserProfile};

/// A submitted query waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub id: Uuid,
    pub query: String,
    pub submitted_at: DateTime<Utc>,
}

impl PendingQuery {
    fn new(query: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            query,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    input: String,
    in_flight: usize,
    log: ConversationLog,
    history: QueryHistory,
    sidebar_expanded: bool,
    user: Option<UserProfile>,
    assembler: MessageAssembler,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(QueryHistory::new(), MessageAssembler::default())
    }
}

impl SessionState {
    pub fn new(history: QueryHistory, assembler: MessageAssembler) -> Self {
        Self {
            input: String::new(),
            in_flight: 0,
            log: ConversationLog::new(),
            history,
            sidebar_expanded: true,
            user: None,
            assembler,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            QueryHistory::with_capacity(config.history.capacity),
            MessageAssembler::new(config.display.error_text.clone()),
        )
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Put a history entry or sample question into the input without sending it.
    pub fn prefill(&mut self, text: &str) {
        tracing::debug!(text, "Prefilling input");
        self.input = text.to_string();
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Submit the current input. Blank input is ignored.
    ///
    /// The user's message is appended right away, before any response.
    pub fn submit(&mut self) -> Option<PendingQuery> {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.input.clear();
        Some(self.begin(query))
    }

    /// Submit `text` directly, as when a suggestion is clicked.
    pub fn submit_text(&mut self, text: &str) -> Option<PendingQuery> {
        self.input = text.to_string();
        self.submit()
    }

    fn begin(&mut self, query: String) -> PendingQuery {
        self.log.append(self.assembler.user_message(&query));
        self.in_flight += 1;
        PendingQuery::new(query)
    }

    /// Apply a finished request. Results land in completion order, and a
    /// result arriving after a clear is still appended.
    pub fn complete(
        &mut self,
        pending: &PendingQuery,
        outcome: Result<QueryResponse, ClientError>,
    ) -> &Message {
        self.in_flight = self.in_flight.saturating_sub(1);

        let assembled = self.assembler.assemble(outcome);
        if assembled.record_history {
            self.history.push(pending.query.clone());
        }

        tracing::debug!(
            query_id = %pending.id,
            elapsed_ms = (Utc::now() - pending.submitted_at).num_milliseconds(),
            is_error = assembled.message.is_error,
            "Query completed"
        );

        self.log.append(assembled.message)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    // ------------------------------------------------------------------
    // Conversation and history
    // ------------------------------------------------------------------

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Empty the conversation. Requests already in flight are not cancelled.
    pub fn clear_conversation(&mut self) {
        self.log.clear();
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    pub fn seed_history(&mut self, entries: Vec<String>) -> bool {
        self.history.seed(entries)
    }

    // ------------------------------------------------------------------
    // Sidebar and user
    // ------------------------------------------------------------------

    pub fn sidebar_expanded(&self) -> bool {
        self.sidebar_expanded
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_expanded = !self.sidebar_expanded;
        self.sidebar_expanded
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
    }

    pub fn sidebar(&self, samples: &[String], width: usize) -> SidebarView {
        SidebarView::build(
            self.sidebar_expanded,
            &self.history,
            samples,
            self.user.as_ref(),
            width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageRole, Section};

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut state = SessionState::default();
        state.set_input("   ");
        assert!(state.submit().is_none());
        assert!(state.log().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.input(), "   ");
    }

    #[test]
    fn test_submit_appends_user_message_first() {
        let mut state = SessionState::default();
        state.set_input("  top customers  ");

        let pending = state.submit().unwrap();
        assert_eq!(pending.query, "top customers");
        assert_eq!(state.input(), "");
        assert!(state.is_loading());
        assert_eq!(state.log().len(), 1);
        assert_eq!(state.log().messages()[0].role, MessageRole::User);
        assert_eq!(state.log().messages()[0].content, "top customers");
    }

    #[test]
    fn test_complete_success_records_history() {
        let mut state = SessionState::default();
        state.set_input("q");
        let pending = state.submit().unwrap();

        let message = state.complete(&pending, Ok(QueryResponse::new("Answer"))).clone();
        assert_eq!(message.sections, vec![Section::PlainText("Answer".into())]);
        assert!(!state.is_loading());
        assert_eq!(state.history().to_vec(), vec!["q"]);
    }

    #[test]
    fn test_complete_access_denied_records_history() {
        let mut state = SessionState::default();
        let pending = state.submit_text("finance report").unwrap();

        let mut response = QueryResponse::new("Access denied: Finance role required");
        response.access_denied = true;
        let message = state.complete(&pending, Ok(response));
        assert!(message.is_error);
        assert_eq!(state.history().to_vec(), vec!["finance report"]);
    }

    #[test]
    fn test_complete_failure_skips_history() {
        let mut state = SessionState::default();
        let pending = state.submit_text("q").unwrap();
        let err = ClientError::Status {
            endpoint: "/api/query".into(),
            status: 502,
            message: "bad gateway".into(),
        };

        let message = state.complete(&pending, Err(err));
        assert!(message.is_error);
        assert!(state.history().is_empty());
        assert_eq!(state.log().len(), 2);
    }

    #[test]
    fn test_late_response_after_clear() {
        let mut state = SessionState::default();
        let pending = state.submit_text("q").unwrap();
        state.clear_conversation();
        assert!(state.log().is_empty());
        assert!(state.is_loading());

        state.complete(&pending, Ok(QueryResponse::new("late")));
        assert_eq!(state.log().len(), 1);
        assert_eq!(state.log().messages()[0].role, MessageRole::Assistant);
    }

    #[test]
    fn test_loading_tracks_all_requests() {
        let mut state = SessionState::default();
        let first = state.submit_text("a").unwrap();
        let second = state.submit_text("b").unwrap();
        assert_eq!(state.in_flight(), 2);

        state.complete(&second, Ok(QueryResponse::new("b")));
        assert!(state.is_loading());
        state.complete(&first, Ok(QueryResponse::new("a")));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_prefill_and_sidebar_toggle() {
        let mut state = SessionState::default();
        state.prefill("What criteria do we use?");
        assert_eq!(state.input(), "What criteria do we use?");

        assert!(state.sidebar_expanded());
        assert!(!state.toggle_sidebar());
        assert!(state.sidebar(&["s".to_string()], 30).samples.is_empty());
    }
}
