//! Turns backend outcomes into conversation messages.

use crate::error::ClientError;
use crate::types::{ChartSpec, Message, QueryResponse, SectionKind};

use super::build_sections;

/// Text shown when a query fails in transport or decoding.
pub const GENERIC_ERROR_TEXT: &str = "Sorry, an error occurred while processing your request.";

/// Result of assembling one backend outcome.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub message: Message,
    /// Whether the originating query belongs in the query history.
    pub record_history: bool,
}

#[derive(Debug, Clone)]
pub struct MessageAssembler {
    error_text: String,
}

impl Default for MessageAssembler {
    fn default() -> Self {
        Self::new(GENERIC_ERROR_TEXT)
    }
}

impl MessageAssembler {
    pub fn new(error_text: impl Into<String>) -> Self {
        Self {
            error_text: error_text.into(),
        }
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    /// Message appended the moment a query is submitted.
    pub fn user_message(&self, query: &str) -> Message {
        Message::user(query)
    }

    pub fn assemble(&self, outcome: Result<QueryResponse, ClientError>) -> Assembled {
        match outcome {
            Ok(response) => Assembled {
                message: self.from_response(response),
                record_history: true,
            },
            Err(err) => {
                tracing::warn!(error = %err, "Query failed, showing generic error");
                Assembled {
                    message: self.failure(),
                    record_history: false,
                }
            }
        }
    }

    pub fn from_response(&self, response: QueryResponse) -> Message {
        if response.access_denied {
            tracing::info!("Query was denied by the backend");
            return Message::system_error(response.answer);
        }

        let sections = build_sections(&response.answer);

        // A prediction already rendered from the answer text is not repeated.
        let has_inline_prediction = sections
            .iter()
            .any(|section| section.kind() == SectionKind::PredictionResult);
        let prediction = response
            .prediction_text()
            .filter(|_| !has_inline_prediction)
            .map(str::to_string);

        let charts: Vec<ChartSpec> = response
            .charts
            .unwrap_or_default()
            .into_iter()
            .map(ChartSpec::from)
            .collect();

        tracing::debug!(
            sections = sections.len(),
            charts = charts.len(),
            has_document = response.document_url.is_some(),
            "Assembled assistant message"
        );

        Message::assistant(response.answer, sections)
            .with_charts(charts)
            .with_document_url(response.document_url)
            .with_prediction(prediction)
    }

    pub fn failure(&self) -> Message {
        Message::system_error(self.error_text.clone())
    }
}
