//! Where analytics events go.

use super::EngagementKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("analytics backend unavailable: {0}")]
    Unavailable(String),

    #[error("analytics backend rejected event: {0}")]
    Rejected(String),
}

/// Analytics backend. Errors are logged by the tracker and never reach the page.
pub trait AnalyticsSink {
    fn record_view(&mut self, post_id: &str, session_id: &str) -> Result<(), SinkError>;

    fn record_engagement(
        &mut self,
        post_id: &str,
        kind: EngagementKind,
        payload: serde_json::Value,
    ) -> Result<(), SinkError>;
}
