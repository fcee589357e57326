//! Sidebar contents: recent queries, sample questions and the user's access.

use serde::Serialize;

use crate::session::QueryHistory;
use crate::types::UserProfile;

pub const DEFAULT_LABEL_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarEntry {
    /// Possibly shortened text for the list.
    pub display: String,
    /// Text placed into the input when the entry is chosen.
    pub full: String,
}

impl SidebarEntry {
    pub fn new(text: &str, width: usize) -> Self {
        Self {
            display: truncate_label(text, width),
            full: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarView {
    pub expanded: bool,
    pub history: Vec<SidebarEntry>,
    pub samples: Vec<SidebarEntry>,
    pub permissions: Option<String>,
}

impl SidebarView {
    /// Collapsed sidebars show nothing but the toggle.
    pub fn build(
        expanded: bool,
        history: &QueryHistory,
        samples: &[String],
        user: Option<&UserProfile>,
        width: usize,
    ) -> Self {
        if !expanded {
            return Self {
                expanded,
                history: Vec::new(),
                samples: Vec::new(),
                permissions: None,
            };
        }

        Self {
            expanded,
            history: history
                .iter()
                .map(|query| SidebarEntry::new(query, width))
                .collect(),
            samples: samples
                .iter()
                .map(|question| SidebarEntry::new(question, width))
                .collect(),
            permissions: user.map(|user| format!("Access: {}, {}", user.role, user.region)),
        }
    }

    /// Entry `index` counting history first, then sample questions.
    pub fn entry(&self, index: usize) -> Option<&SidebarEntry> {
        self.history.iter().chain(self.samples.iter()).nth(index)
    }
}

/// Shorten `text` to `width` characters followed by "..." when longer.
pub fn truncate_label(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Header line identifying the signed-in user.
pub fn user_line(user: &UserProfile) -> String {
    format!("{} | {} | {}", user.name, user.role, user.region)
}
