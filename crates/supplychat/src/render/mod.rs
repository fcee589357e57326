//! View models consumed by front-ends.

pub mod blocks;
pub mod chart;
pub mod sidebar;

pub use blocks::{render_message, BlockBody, MessageView, RenderBlock};
pub use chart::{normalize_chart, normalize_series, ChartBar, ChartView};
pub use sidebar::{user_line, SidebarEntry, SidebarView};
