//! Core of the supply-chain assistant dashboard.
//!
//! Answers from the assistant arrive as a single block of text with literal
//! section markers embedded in it. This crate splits and classifies that text
//! into typed sections, normalizes chart data for bar rendering, and keeps the
//! per-session conversation log and query history.

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod speech;
pub mod types;

// Re-export primary types for convenience
pub use client::{HttpQueryClient, QueryApi};
pub use config::DashboardConfig;
pub use error::{ClientError, ConfigError};
pub use pipeline::{build_sections, classify, extract_suggestions, split_sections, MessageAssembler};
pub use render::{normalize_chart, render_message, ChartView, MessageView, RenderBlock, SidebarView};
pub use session::{ConversationLog, PendingQuery, QueryHistory, Session, SessionEvent, SessionState};
pub use speech::{toggle_speech, InMemorySynthesizer, SpeechState, SpeechSynthesizer};
pub use types::{
    ChartSeries, ChartSpec, Message, MessageRole, QueryRequest, QueryResponse, Section,
    SectionKind, UserProfile,
};

// Re-export common types
pub use anyhow::{Error, Result};
pub use uuid::Uuid;
