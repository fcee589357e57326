use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Conversation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// One classified chunk of an assistant answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "kebab-case")]
pub enum Section {
    Table(String),
    Explanation(String),
    SqlQuery(String),
    AccessLog(String),
    Suggestions(Vec<String>),
    Metadata(String),
    PredictionResult(String),
    PlainText(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Table,
    Explanation,
    SqlQuery,
    AccessLog,
    Suggestions,
    Metadata,
    PredictionResult,
    PlainText,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Table(_) => SectionKind::Table,
            Section::Explanation(_) => SectionKind::Explanation,
            Section::SqlQuery(_) => SectionKind::SqlQuery,
            Section::AccessLog(_) => SectionKind::AccessLog,
            Section::Suggestions(_) => SectionKind::Suggestions,
            Section::Metadata(_) => SectionKind::Metadata,
            Section::PredictionResult(_) => SectionKind::PredictionResult,
            Section::PlainText(_) => SectionKind::PlainText,
        }
    }
}

/// A single entry of the conversation log. Never edited after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    /// Raw text: the query for user messages, the unprocessed answer otherwise.
    pub content: String,
    pub sections: Vec<Section>,
    pub charts: Vec<ChartSpec>,
    pub document_url: Option<String>,
    /// Standalone prediction text shown after the sections.
    pub prediction: Option<String>,
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn base(role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            sections: Vec::new(),
            charts: Vec::new(),
            document_url: None,
            prediction: None,
            is_error: false,
            timestamp: Utc::now(),
        }
    }

    pub fn user(query: impl Into<String>) -> Self {
        Self::base(MessageRole::User, query.into())
    }

    pub fn assistant(content: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            sections,
            ..Self::base(MessageRole::Assistant, content.into())
        }
    }

    /// Error-styled system message holding a single plain section.
    pub fn system_error(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            sections: vec![Section::PlainText(text.clone())],
            is_error: true,
            ..Self::base(MessageRole::System, text)
        }
    }

    pub fn with_charts(mut self, charts: Vec<ChartSpec>) -> Self {
        self.charts = charts;
        self
    }

    pub fn with_document_url(mut self, url: Option<String>) -> Self {
        self.document_url = url;
        self
    }

    pub fn with_prediction(mut self, prediction: Option<String>) -> Self {
        self.prediction = prediction;
        self
    }

    pub fn suggestions(&self) -> impl Iterator<Item = &String> {
        self.sections.iter().flat_map(|section| match section {
            Section::Suggestions(items) => items.as_slice(),
            _ => &[][..],
        })
    }
}

// ============================================================================
// Charts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: Option<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

/// Chart labels plus one or more series. Only the first series is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub title: Option<String>,
}

impl ChartSpec {
    pub fn primary_series(&self) -> Option<&ChartSeries> {
        self.series.first()
    }
}

/// Chart.js shaped chart object as emitted by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireChart {
    #[serde(rename = "type", default)]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub data: WireChartData,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<WireDataset>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDataset {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default)]
    pub background_color: Option<ColorList>,
}

/// `backgroundColor` is either one color for every bar or one per bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorList {
    Single(String),
    Many(Vec<String>),
}

impl From<ColorList> for Vec<String> {
    fn from(colors: ColorList) -> Self {
        match colors {
            ColorList::Single(color) => vec![color],
            ColorList::Many(colors) => colors,
        }
    }
}

impl From<WireChart> for ChartSpec {
    fn from(chart: WireChart) -> Self {
        let title = chart
            .options
            .as_ref()
            .and_then(|options| options.pointer("/plugins/title/text"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let series = chart
            .data
            .datasets
            .into_iter()
            .map(|dataset| ChartSeries {
                label: dataset.label,
                values: dataset.data,
                colors: dataset.background_color.map(Vec::from).unwrap_or_default(),
            })
            .collect();

        Self {
            kind: chart.chart_type.unwrap_or_else(|| "bar".to_string()),
            labels: chart.data.labels,
            series,
            title,
        }
    }
}

// ============================================================================
// Wire contract
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Body of `POST /api/query`.
///
/// Only `answer`, `access_denied`, `document_url`, `charts` and
/// `prediction_results` feed the pipeline; the other fields are already
/// encoded as markers inside `answer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub access_denied: bool,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub charts: Option<Vec<WireChart>>,
    #[serde(default)]
    pub prediction_results: Option<Value>,
    #[serde(default)]
    pub proactive_suggestions: Option<Value>,
    #[serde(default)]
    pub leaderboard_position: Option<Value>,
    #[serde(default)]
    pub compliance_score: Option<Value>,
    #[serde(default)]
    pub access_attempt_logged: Option<Value>,
    #[serde(default)]
    pub debug: Option<Value>,
}

impl QueryResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..Default::default()
        }
    }

    /// Standalone prediction text, only when the backend sent a non-empty string.
    pub fn prediction_text(&self) -> Option<&str> {
        match &self.prediction_results {
            Some(Value::String(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_chart_conversion() {
        let raw = r##"{
            "type": "bar",
            "data": {
                "labels": ["Customer 1", "Customer 2"],
                "datasets": [{
                    "label": "Total Order Value ($)",
                    "data": [1200.5, 600],
                    "backgroundColor": ["#4CAF50", "#2196F3"],
                    "borderWidth": 1
                }]
            },
            "options": {"plugins": {"title": {"display": true, "text": "Top Customers"}}}
        }"##;

        let wire: WireChart = serde_json::from_str(raw).unwrap();
        let chart = ChartSpec::from(wire);

        assert_eq!(chart.kind, "bar");
        assert_eq!(chart.title.as_deref(), Some("Top Customers"));
        assert_eq!(chart.labels, vec!["Customer 1", "Customer 2"]);
        let series = chart.primary_series().unwrap();
        assert_eq!(series.values, vec![1200.5, 600.0]);
        assert_eq!(series.colors, vec!["#4CAF50", "#2196F3"]);
    }

    #[test]
    fn test_single_background_color() {
        let raw = r#"{"type": "line", "data": {"labels": ["a"], "datasets": [{"data": [1], "backgroundColor": "rgba(76, 175, 80, 0.2)"}]}}"#;
        let chart = ChartSpec::from(serde_json::from_str::<WireChart>(raw).unwrap());

        assert_eq!(chart.title, None);
        assert_eq!(chart.series[0].colors, vec!["rgba(76, 175, 80, 0.2)"]);
    }

    #[test]
    fn test_query_response_optional_fields() {
        let raw = r#"{
            "answer": "hello",
            "accessDenied": false,
            "documentUrl": null,
            "charts": [],
            "predictionResults": "",
            "proactiveSuggestions": [],
            "leaderboardPosition": null,
            "complianceScore": 87,
            "accessAttemptLogged": "",
            "debug": {"role": "planning_manager"}
        }"#;

        let response: QueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.answer, "hello");
        assert!(response.document_url.is_none());
        assert!(response.prediction_text().is_none());
    }

    #[test]
    fn test_prediction_text_requires_string() {
        let mut response = QueryResponse::new("x");
        response.prediction_results = Some(serde_json::json!([{"shipping_mode": "Air"}]));
        assert!(response.prediction_text().is_none());

        response.prediction_results = Some(Value::String("Late risk 12%".into()));
        assert_eq!(response.prediction_text(), Some("Late risk 12%"));
    }

    #[test]
    fn test_missing_answer_is_rejected() {
        let result = serde_json::from_str::<QueryResponse>(r#"{"accessDenied": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_message_suggestions() {
        let message = Message::assistant(
            "",
            vec![
                Section::PlainText("hi".into()),
                Section::Suggestions(vec!["A?".into(), "B?".into()]),
            ],
        );
        let items: Vec<_> = message.suggestions().cloned().collect();
        assert_eq!(items, vec!["A?", "B?"]);
    }
}
