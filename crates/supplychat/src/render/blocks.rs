//! Presentation blocks handed to a front-end.
//!
//! Block identifiers are part of the contract with stylesheets and renderers
//! and must not change.

use serde::{Deserialize, Serialize};

use super::chart::{normalize_chart, ChartView};
use crate::types::{Message, MessageRole, Section};

pub const TABLE_BLOCK: &str = "table";
pub const EXPLANATION_BLOCK: &str = "explanation";
pub const SQL_QUERY_BLOCK: &str = "sql-query";
pub const ACCESS_LOG_BLOCK: &str = "access-log";
pub const SUGGESTIONS_BLOCK: &str = "suggestions";
pub const METADATA_BLOCK: &str = "metadata";
pub const PREDICTION_BLOCK: &str = "prediction-results";
pub const DOCUMENT_LINK_BLOCK: &str = "document-link";
pub const CHART_BLOCK: &str = "chart";

pub const DOCUMENT_LINK_LABEL: &str = "View Document";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    Text { text: String },
    /// Whitespace-significant text such as ASCII tables and SQL.
    Preformatted { text: String },
    Emphasis { text: String },
    /// Each entry re-submits itself as a new query when chosen.
    Suggestions { items: Vec<String> },
    /// External link, opened outside the dashboard.
    Link { label: String, url: String },
    Chart { chart: ChartView },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBlock {
    /// Styling hook; `None` for plain paragraphs.
    pub block_id: Option<&'static str>,
    pub heading: Option<&'static str>,
    pub body: BlockBody,
    pub collapsible: bool,
    pub collapsed: bool,
}

impl RenderBlock {
    fn new(block_id: Option<&'static str>, heading: Option<&'static str>, body: BlockBody) -> Self {
        Self {
            block_id,
            heading,
            body,
            collapsible: false,
            collapsed: false,
        }
    }

    fn collapsed_by_default(mut self) -> Self {
        self.collapsible = true;
        self.collapsed = true;
        self
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(None, None, BlockBody::Text { text: text.into() })
    }

    pub fn from_section(section: &Section) -> Self {
        match section {
            Section::Table(text) => Self::new(
                Some(TABLE_BLOCK),
                None,
                BlockBody::Preformatted { text: text.clone() },
            ),
            Section::Explanation(text) => Self::new(
                Some(EXPLANATION_BLOCK),
                Some("Explanation and Insights"),
                BlockBody::Text { text: text.clone() },
            ),
            Section::SqlQuery(text) => Self::new(
                Some(SQL_QUERY_BLOCK),
                Some("SQL Query Used"),
                BlockBody::Preformatted { text: text.clone() },
            )
            .collapsed_by_default(),
            Section::AccessLog(text) => Self::new(
                Some(ACCESS_LOG_BLOCK),
                None,
                BlockBody::Emphasis { text: text.clone() },
            ),
            Section::Suggestions(items) => Self::new(
                Some(SUGGESTIONS_BLOCK),
                Some("Proactive Suggestions"),
                BlockBody::Suggestions {
                    items: items.clone(),
                },
            ),
            Section::Metadata(text) => Self::new(
                Some(METADATA_BLOCK),
                None,
                BlockBody::Text { text: text.clone() },
            ),
            Section::PredictionResult(text) => Self::prediction(text),
            Section::PlainText(text) => Self::plain(text.clone()),
        }
    }

    pub fn prediction(text: &str) -> Self {
        Self::new(
            Some(PREDICTION_BLOCK),
            Some("Prediction Results"),
            BlockBody::Text {
                text: text.to_string(),
            },
        )
    }

    pub fn document_link(url: &str) -> Self {
        Self::new(
            Some(DOCUMENT_LINK_BLOCK),
            None,
            BlockBody::Link {
                label: DOCUMENT_LINK_LABEL.to_string(),
                url: url.to_string(),
            },
        )
    }

    pub fn chart(chart: ChartView) -> Self {
        Self::new(Some(CHART_BLOCK), None, BlockBody::Chart { chart })
    }

    /// Plain block with nothing to show.
    pub fn is_blank(&self) -> bool {
        self.block_id.is_none()
            && matches!(&self.body, BlockBody::Text { text } if text.trim().is_empty())
    }
}

/// Everything a front-end needs to draw one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub role: MessageRole,
    pub is_error: bool,
    /// Assistant answers offer a read-aloud toggle.
    pub speakable: bool,
    pub blocks: Vec<RenderBlock>,
}

/// Lay out a message: sections, standalone prediction, document link, charts.
pub fn render_message(message: &Message) -> MessageView {
    let mut blocks = Vec::new();

    if message.role == MessageRole::User {
        blocks.push(RenderBlock::plain(message.content.clone()));
    } else {
        blocks.extend(message.sections.iter().map(RenderBlock::from_section));

        if let Some(prediction) = &message.prediction {
            blocks.push(RenderBlock::prediction(prediction));
        }
        if let Some(url) = &message.document_url {
            blocks.push(RenderBlock::document_link(url));
        }
        blocks.extend(
            message
                .charts
                .iter()
                .map(|chart| RenderBlock::chart(normalize_chart(chart))),
        );
    }

    MessageView {
        role: message.role,
        is_error: message.is_error,
        speakable: message.role == MessageRole::Assistant,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartSeries, ChartSpec};

    #[test]
    fn test_block_identifiers() {
        let ids: Vec<_> = [
            Section::Table("t".into()),
            Section::Explanation("e".into()),
            Section::SqlQuery("s".into()),
            Section::AccessLog("a".into()),
            Section::Suggestions(vec![]),
            Section::Metadata("m".into()),
            Section::PredictionResult("p".into()),
            Section::PlainText("x".into()),
        ]
        .iter()
        .map(|section| RenderBlock::from_section(section).block_id)
        .collect();

        assert_eq!(
            ids,
            vec![
                Some("table"),
                Some("explanation"),
                Some("sql-query"),
                Some("access-log"),
                Some("suggestions"),
                Some("metadata"),
                Some("prediction-results"),
                None,
            ]
        );
    }

    #[test]
    fn test_sql_collapsed_by_default() {
        let block = RenderBlock::from_section(&Section::SqlQuery("SELECT 1".into()));
        assert!(block.collapsible);
        assert!(block.collapsed);

        let table = RenderBlock::from_section(&Section::Table("|".into()));
        assert!(!table.collapsible);
    }

    #[test]
    fn test_render_order() {
        let message = Message::assistant("body", vec![Section::PlainText("body".into())])
            .with_prediction(Some("Air 5%".into()))
            .with_document_url(Some("https://example.com/doc".into()))
            .with_charts(vec![ChartSpec {
                kind: "bar".into(),
                labels: vec!["a".into()],
                series: vec![ChartSeries {
                    label: None,
                    values: vec![1.0],
                    colors: vec![],
                }],
                title: None,
            }]);

        let view = render_message(&message);
        let ids: Vec<_> = view.blocks.iter().map(|b| b.block_id).collect();
        assert_eq!(
            ids,
            vec![None, Some("prediction-results"), Some("document-link"), Some("chart")]
        );
        assert!(view.speakable);
    }

    #[test]
    fn test_user_message_is_raw() {
        let view = render_message(&Message::user("Show | late orders"));
        assert_eq!(view.blocks, vec![RenderBlock::plain("Show | late orders")]);
        assert!(!view.speakable);
    }

    #[test]
    fn test_error_message_flagged() {
        let view = render_message(&Message::system_error("nope"));
        assert!(view.is_error);
        assert!(!view.speakable);
        assert_eq!(view.blocks.len(), 1);
    }

    #[test]
    fn test_blank_detection() {
        assert!(RenderBlock::plain("").is_blank());
        assert!(!RenderBlock::plain("x").is_blank());
        assert!(!RenderBlock::prediction("").is_blank());
    }
}
