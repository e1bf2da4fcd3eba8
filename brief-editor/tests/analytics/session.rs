use crate::support::{RecordingSink, TestClock};
use brief_editor::analytics::{
    EngagementKind, InMemorySessionStore, SessionState, SessionStore, SessionTracker,
    TrackerOptions,
};
use serde_json::json;

type Tracker<'a> = SessionTracker<InMemorySessionStore, RecordingSink, &'a TestClock>;

fn tracker(clock: &TestClock) -> Tracker<'_> {
    SessionTracker::new(
        InMemorySessionStore::new(),
        RecordingSink::default(),
        clock,
        TrackerOptions::default(),
    )
}

#[test]
fn scroll_depth_forwards_new_maxima_only() {
    let clock = TestClock::at(1_000);
    let mut tracker = tracker(&clock);
    tracker.start("post-1");

    for depth in [10, 5, 40, 30, 41] {
        tracker.record_scroll(depth);
    }

    assert_eq!(
        tracker.sink().of_kind(EngagementKind::ScrollDepth),
        vec![&json!({"depth": 10}), &json!({"depth": 40}), &json!({"depth": 41})]
    );
}

#[test]
fn scroll_at_the_top_is_not_forwarded() {
    let clock = TestClock::at(1_000);
    let mut tracker = tracker(&clock);
    tracker.start("post-1");

    assert!(!tracker.record_scroll(0));
    assert!(tracker.record_scroll(10));

    assert_eq!(
        tracker.sink().of_kind(EngagementKind::ScrollDepth),
        vec![&json!({"depth": 10})]
    );
}

#[test]
fn view_is_recorded_once_per_session() {
    let clock = TestClock::at(1_000);
    let mut tracker = tracker(&clock);
    tracker.start("post-1");

    assert!(tracker.track_view());
    assert!(!tracker.track_view());
    assert_eq!(tracker.sink().views.len(), 1);

    let session_id = tracker.session_id().unwrap().to_string();
    let marker = format!("viewed_post-1_{session_id}");
    assert!(tracker.store().get(&marker).is_some());
}

#[test]
fn session_id_is_reused_within_the_tab() {
    let clock = TestClock::at(1_000);
    let mut tracker = tracker(&clock);
    tracker.start("post-1");
    let first = tracker.session_id().unwrap().to_string();
    assert!(first.starts_with("session_1000_"));
    assert_eq!(first.len(), "session_1000_".len() + 9);

    clock.advance(10_000);
    tracker.start("post-2");
    assert_eq!(tracker.session_id(), Some(first.as_str()));
    assert_eq!(
        tracker.store().get("analytics_session_id").as_deref(),
        Some(first.as_str())
    );
}

#[test]
fn time_on_page_is_sent_once() {
    let clock = TestClock::at(1_000);
    let mut tracker = tracker(&clock);
    tracker.start("post-1");
    clock.advance(65_400);

    assert_eq!(tracker.end(), Some(65_400));
    assert_eq!(tracker.end(), None);
    assert_eq!(tracker.state(), &SessionState::Idle);
    assert_eq!(
        tracker.sink().of_kind(EngagementKind::TimeOnPage),
        vec![&json!({"seconds": 65})]
    );
}

#[test]
fn switching_posts_ends_previous_session() {
    let clock = TestClock::at(0);
    let mut tracker = tracker(&clock);
    tracker.start("post-1");
    tracker.record_scroll(80);
    clock.advance(2_000);
    tracker.start("post-2");
    tracker.record_scroll(10);

    let sink = tracker.sink();
    assert_eq!(sink.of_kind(EngagementKind::TimeOnPage).len(), 1);
    assert_eq!(sink.engagements[1].0, "post-1");
    assert_eq!(
        sink.engagements.last().map(|(post, _, _)| post.as_str()),
        Some("post-2")
    );
}

#[test]
fn share_is_tracked() {
    let clock = TestClock::at(0);
    let mut tracker = tracker(&clock);
    assert!(!tracker.track_share("linkedin"));
    tracker.start("post-1");
    assert!(tracker.track_share("linkedin"));
    assert_eq!(
        tracker.sink().of_kind(EngagementKind::Share),
        vec![&json!({"platform": "linkedin"})]
    );
}

#[test]
fn sink_failures_are_swallowed() {
    let clock = TestClock::at(0);
    let mut tracker = SessionTracker::new(
        InMemorySessionStore::new(),
        RecordingSink::offline(),
        &clock,
        TrackerOptions::default(),
    );
    tracker.start("post-1");
    assert!(!tracker.track_view());
    assert!(tracker.record_scroll(50));
    assert_eq!(tracker.end(), Some(0));
}

#[test]
fn disabled_tracker_stays_idle() {
    let clock = TestClock::at(0);
    let mut tracker = SessionTracker::new(
        InMemorySessionStore::new(),
        RecordingSink::default(),
        &clock,
        TrackerOptions {
            enabled: false,
            ..TrackerOptions::default()
        },
    );
    tracker.start("post-1");
    assert!(!tracker.track_view());
    assert!(!tracker.record_scroll(10));
    assert_eq!(tracker.end(), None);
    assert!(tracker.store().is_empty());
}
