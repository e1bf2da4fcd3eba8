//! Reader analytics for an article page.
//!
//! A [`SessionTracker`] is idle until a post page activates it and idle again after
//! teardown. While active it deduplicates views per session, forwards scroll depth only
//! when a new maximum is reached, and reports time on page once.

pub mod sink;
pub mod store;
pub mod tracker;

pub use sink::{AnalyticsSink, SinkError};
pub use store::{InMemorySessionStore, SessionStore};
pub use tracker::{ActiveSession, SessionState, SessionTracker};

use serde::Serialize;

/// Engagement events forwarded to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    ScrollDepth,
    TimeOnPage,
    Share,
}

impl EngagementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementKind::ScrollDepth => "scroll_depth",
            EngagementKind::TimeOnPage => "time_on_page",
            EngagementKind::Share => "share",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerOptions {
    pub enabled: bool,
    /// Store key holding the tab's session id.
    pub session_key: String,
    /// Prefix of the per-post view markers.
    pub view_marker_prefix: String,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            session_key: "analytics_session_id".to_string(),
            view_marker_prefix: "viewed_".to_string(),
        }
    }
}

/// Percentage of the scrollable height above the viewport's top edge, 0 to 100.
///
/// A page that does not scroll counts as fully read.
pub fn scroll_depth(scroll_top: f64, viewport_height: f64, document_height: f64) -> u8 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 100;
    }
    let percent = (scroll_top / scrollable * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
