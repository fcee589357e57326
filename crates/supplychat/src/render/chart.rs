//! Bar-chart normalization.
//!
//! Values are scaled against the largest value so the tallest bar is 100%.

use serde::{Deserialize, Serialize};

use crate::types::ChartSpec;

pub const DEFAULT_CHART_TITLE: &str = "Chart";
const LABEL_PREFIX: &str = "Customer ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub label: String,
    /// Label with a leading "Customer " removed.
    pub display_label: String,
    pub value: f64,
    /// Bar height in percent of the tallest bar.
    pub percentage: f64,
    pub color: Option<String>,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub title: String,
    pub kind: String,
    pub bars: Vec<ChartBar>,
}

impl ChartView {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Percent heights for `values`; all zeros when the maximum is zero.
pub fn percentages(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |m| m.max(v)))
    });
    let max = max.unwrap_or(0.0);

    values
        .iter()
        .map(|value| if max == 0.0 { 0.0 } else { value / max * 100.0 })
        .collect()
}

/// Color for bar `index`, reusing the palette cyclically.
pub fn cycle_color(colors: &[String], index: usize) -> Option<&str> {
    if colors.is_empty() {
        return None;
    }
    Some(colors[index % colors.len()].as_str())
}

pub fn display_label(label: &str) -> String {
    label.strip_prefix(LABEL_PREFIX).unwrap_or(label).to_string()
}

/// `"<label>: $<value>"` with two decimals; half-cent ties round away from zero.
pub fn tooltip(label: &str, value: f64) -> String {
    let cents = (value * 100.0).round() / 100.0;
    format!("{}: ${:.2}", label, cents)
}

/// Bars for one series. A value without a label gets an empty label.
pub fn normalize_series(labels: &[String], values: &[f64], colors: &[String]) -> Vec<ChartBar> {
    percentages(values)
        .into_iter()
        .zip(values)
        .enumerate()
        .map(|(index, (percentage, &value))| {
            let label = labels.get(index).cloned().unwrap_or_default();
            ChartBar {
                display_label: display_label(&label),
                tooltip: tooltip(&label, value),
                color: cycle_color(colors, index).map(str::to_string),
                label,
                value,
                percentage,
            }
        })
        .collect()
}

/// Normalize the first series of a chart. Further series are not drawn.
pub fn normalize_chart(chart: &ChartSpec) -> ChartView {
    let bars = chart
        .primary_series()
        .map(|series| normalize_series(&chart.labels, &series.values, &series.colors))
        .unwrap_or_default();

    ChartView {
        title: chart
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_CHART_TITLE.to_string()),
        kind: chart.kind.clone(),
        bars,
    }
}
