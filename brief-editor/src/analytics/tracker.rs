//! The per-page session state machine.

use super::sink::AnalyticsSink;
use super::store::SessionStore;
use super::{EngagementKind, TrackerOptions};
use crate::clock::Clock;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub post_id: String,
    pub session_id: String,
    pub started_at: u64,
    /// Deepest scroll forwarded so far. The top of the page counts as already seen.
    pub max_scroll: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active(ActiveSession),
}

pub struct SessionTracker<S, A, C> {
    store: S,
    sink: A,
    clock: C,
    options: TrackerOptions,
    state: SessionState,
}

impl<S: SessionStore, A: AnalyticsSink, C: Clock> SessionTracker<S, A, C> {
    pub fn new(store: S, sink: A, clock: C, options: TrackerOptions) -> Self {
        Self {
            store,
            sink,
            clock,
            options,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn session_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active(session) => Some(&session.session_id),
            SessionState::Idle => None,
        }
    }

    /// Activate for `post_id`. An active session for another post is ended first.
    pub fn start(&mut self, post_id: &str) {
        if !self.options.enabled {
            return;
        }
        if let SessionState::Active(session) = &self.state {
            if session.post_id == post_id {
                return;
            }
            self.end();
        }

        let session_id = self.session_id_for_tab();
        tracing::debug!(post_id, %session_id, "analytics session started");
        self.state = SessionState::Active(ActiveSession {
            post_id: post_id.to_string(),
            session_id,
            started_at: self.clock.now_millis(),
            max_scroll: 0,
        });
    }

    /// The tab's session id, created on first use.
    fn session_id_for_tab(&mut self) -> String {
        if let Some(existing) = self.store.get(&self.options.session_key) {
            return existing;
        }
        let random = Uuid::new_v4().simple().to_string();
        let session_id = format!("session_{}_{}", self.clock.now_millis(), &random[..9]);
        self.store.set(&self.options.session_key, &session_id);
        session_id
    }

    /// Record a view once per post and session. Returns true when it was forwarded.
    pub fn track_view(&mut self) -> bool {
        let SessionState::Active(session) = &self.state else {
            return false;
        };
        let marker = format!(
            "{}{}_{}",
            self.options.view_marker_prefix, session.post_id, session.session_id
        );
        if self.store.get(&marker).is_some() {
            tracing::trace!(%marker, "view already recorded");
            return false;
        }
        match self.sink.record_view(&session.post_id, &session.session_id) {
            Ok(()) => {
                self.store.set(&marker, "true");
                true
            }
            Err(err) => {
                tracing::warn!(post_id = %session.post_id, error = %err, "failed to record view");
                false
            }
        }
    }

    /// Forward a scroll depth if it beats the deepest one so far.
    pub fn record_scroll(&mut self, depth: u8) -> bool {
        let depth = depth.min(100);
        let SessionState::Active(session) = &mut self.state else {
            return false;
        };
        if depth <= session.max_scroll {
            return false;
        }
        session.max_scroll = depth;
        let post_id = session.post_id.clone();
        self.engagement(&post_id, EngagementKind::ScrollDepth, json!({ "depth": depth }));
        true
    }

    pub fn track_share(&mut self, platform: &str) -> bool {
        let SessionState::Active(session) = &self.state else {
            return false;
        };
        let post_id = session.post_id.clone();
        self.engagement(&post_id, EngagementKind::Share, json!({ "platform": platform }));
        true
    }

    /// Tear down: report time on page and go idle. Returns the elapsed milliseconds,
    /// or `None` when there was no active session.
    pub fn end(&mut self) -> Option<u64> {
        let SessionState::Active(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let elapsed = self.clock.now_millis().saturating_sub(session.started_at);
        let seconds = (elapsed as f64 / 1000.0).round() as u64;
        self.engagement(
            &session.post_id,
            EngagementKind::TimeOnPage,
            json!({ "seconds": seconds }),
        );
        tracing::debug!(post_id = %session.post_id, elapsed, "analytics session ended");
        Some(elapsed)
    }

    fn engagement(&mut self, post_id: &str, kind: EngagementKind, payload: serde_json::Value) {
        if let Err(err) = self.sink.record_engagement(post_id, kind, payload) {
            tracing::warn!(
                post_id,
                kind = kind.as_str(),
                error = %err,
                "failed to record engagement"
            );
        }
    }
}
