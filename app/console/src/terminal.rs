//! Plain-text rendering of message views for the terminal.

use std::fmt::Write;

use supplychat::config::DisplayConfig;
use supplychat::render::{BlockBody, ChartView, MessageView, RenderBlock, SidebarView};
use supplychat::MessageRole;

const BAR_GLYPH: char = '#';

pub struct TerminalRenderer {
    pub expand_sql: bool,
    chart_width: usize,
    axis_label: String,
}

impl TerminalRenderer {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            expand_sql: false,
            chart_width: display.chart_width,
            axis_label: display.chart_axis_label.clone(),
        }
    }

    pub fn render(&self, view: &MessageView) -> String {
        let mut out = String::new();
        let speaker = match view.role {
            MessageRole::User => "You",
            MessageRole::Assistant => "Assistant",
            MessageRole::System => "System",
        };
        if view.is_error {
            let _ = writeln!(out, "[error] {}:", speaker);
        } else {
            let _ = writeln!(out, "{}:", speaker);
        }

        for block in view.blocks.iter().filter(|block| !block.is_blank()) {
            self.render_block(block, &mut out);
        }

        if view.speakable {
            out.push_str("  (/speak to read aloud)\n");
        }
        out
    }

    fn render_block(&self, block: &RenderBlock, out: &mut String) {
        if block.collapsed && !self.expand_sql {
            let _ = writeln!(
                out,
                "  [+] {} (hidden, /sql to show)",
                block.heading.unwrap_or("details")
            );
            return;
        }

        if let Some(heading) = block.heading {
            let _ = writeln!(out, "  == {} ==", heading);
        }

        match &block.body {
            BlockBody::Text { text } => indent(out, text, "  "),
            BlockBody::Preformatted { text } => indent(out, text, "    "),
            BlockBody::Emphasis { text } => {
                let _ = writeln!(out, "  _{}_", text);
            }
            BlockBody::Suggestions { items } => {
                for (i, item) in items.iter().enumerate() {
                    let _ = writeln!(out, "  [{}] {}", i + 1, item);
                }
                out.push_str("  (/suggest N to ask)\n");
            }
            BlockBody::Link { label, url } => {
                let _ = writeln!(out, "  {}: {}", label, url);
            }
            BlockBody::Chart { chart } => out.push_str(&self.render_chart(chart)),
        }
    }

    /// Horizontal bar chart; bar length follows the normalized percentage.
    pub fn render_chart(&self, chart: &ChartView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  == {} ==", chart.title);
        if chart.bars.is_empty() {
            out.push_str("  (no data)\n");
            return out;
        }

        let label_width = chart
            .bars
            .iter()
            .map(|bar| bar.display_label.chars().count())
            .max()
            .unwrap_or(0);

        for bar in &chart.bars {
            let cells = bar_cells(bar.percentage, self.chart_width);
            let color = bar
                .color
                .as_deref()
                .map(|c| format!(" [{}]", c))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<width$} |{:<cells_width$}| {}{}",
                bar.display_label,
                BAR_GLYPH.to_string().repeat(cells),
                bar.tooltip,
                color,
                width = label_width,
                cells_width = self.chart_width,
            );
        }
        let _ = writeln!(out, "  {}", self.axis_label);
        out
    }

    pub fn render_sidebar(&self, sidebar: &SidebarView, user_line: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(line) = user_line {
            let _ = writeln!(out, "{}", line);
        }
        if !sidebar.expanded {
            out.push_str("[sidebar collapsed, /sidebar toggle to expand]\n");
            return out;
        }

        out.push_str("Query History\n");
        if sidebar.history.is_empty() {
            out.push_str("  (none yet)\n");
        }
        for (i, entry) in sidebar.history.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {}", i + 1, entry.display);
        }

        out.push_str("Sample Questions\n");
        let offset = sidebar.history.len();
        for (i, entry) in sidebar.samples.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {}", offset + i + 1, entry.display);
        }

        if let Some(permissions) = &sidebar.permissions {
            out.push_str("Permissions\n");
            let _ = writeln!(out, "  {}", permissions);
        }
        out
    }
}

fn indent(out: &mut String, text: &str, prefix: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "{}{}", prefix, line);
    }
}

/// Filled cells for a bar of `percentage` within `width` columns.
fn bar_cells(percentage: f64, width: usize) -> usize {
    if !percentage.is_finite() || percentage <= 0.0 {
        return 0;
    }
    let cells = (percentage / 100.0 * width as f64).round() as usize;
    cells.clamp(1, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplychat::render::render_message;
    use supplychat::types::{ChartSeries, ChartSpec};
    use supplychat::{normalize_chart, Message, Section};

    fn renderer() -> TerminalRenderer {
        TerminalRenderer::new(&DisplayConfig {
            chart_width: 10,
            ..DisplayConfig::default()
        })
    }

    #[test]
    fn test_bar_cells() {
        assert_eq!(bar_cells(100.0, 10), 10);
        assert_eq!(bar_cells(50.0, 10), 5);
        assert_eq!(bar_cells(0.0, 10), 0);
        assert_eq!(bar_cells(1.0, 10), 1);
        assert_eq!(bar_cells(f64::NAN, 10), 0);
    }

    #[test]
    fn test_sql_hidden_until_expanded() {
        let message = Message::assistant(
            "",
            vec![Section::SqlQuery("SELECT * FROM orders".into())],
        );
        let view = render_message(&message);

        let mut renderer = renderer();
        let hidden = renderer.render(&view);
        assert!(hidden.contains("[+] SQL Query Used"));
        assert!(!hidden.contains("SELECT"));

        renderer.expand_sql = true;
        let shown = renderer.render(&view);
        assert!(shown.contains("    SELECT * FROM orders"));
    }

    #[test]
    fn test_empty_plain_blocks_skipped() {
        let message = Message::assistant(
            "",
            vec![Section::PlainText("".into()), Section::PlainText("hello".into())],
        );
        let text = renderer().render(&render_message(&message));
        assert_eq!(text, "Assistant:\n  hello\n  (/speak to read aloud)\n");
    }

    #[test]
    fn test_error_prefix() {
        let text = renderer().render(&render_message(&Message::system_error("boom")));
        assert!(text.starts_with("[error] System:"));
    }

    #[test]
    fn test_chart_rendering() {
        let chart = ChartSpec {
            kind: "bar".into(),
            labels: vec!["Customer 7".into(), "Customer 12".into()],
            series: vec![ChartSeries {
                label: None,
                values: vec![10.0, 5.0],
                colors: vec!["#4CAF50".into()],
            }],
            title: Some("Top Customers".into()),
        };

        let text = renderer().render_chart(&normalize_chart(&chart));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "  == Top Customers ==");
        assert_eq!(lines[1], "  7  |##########| Customer 7: $10.00 [#4CAF50]");
        assert_eq!(lines[2], "  12 |#####     | Customer 12: $5.00 [#4CAF50]");
        assert_eq!(lines[3], "  Total Order Value ($)");
    }
}
