use super::*;

use crate::{
    classifier::AqiCategory,
    orchestrator::Slot,
    test_support::{location, reading},
};

fn bundle_for(raw: &str, index: f64) -> FetchBundle {
    FetchBundle {
        location: location(raw),
        reading: Slot::Loaded(reading(raw, index)),
        historical: Slot::Loaded(vec![HistoricalPoint {
            time: "07:00".to_string(),
            index,
            pm2_5: None,
            pm10: None,
            co: None,
        }]),
        forecast: Slot::Loaded(vec![ForecastPoint {
            day: "Day 1".to_string(),
            predicted_index: index,
            confidence: None,
        }]),
        alerts: Slot::Empty,
        completed_at: Utc::now(),
    }
}

#[test]
fn initial_state_is_loading_the_default_location() {
    let (state, ticket) = ViewState::initial(location("Lahore"));
    let snapshot = state.snapshot();

    assert_eq!(ticket.seq, 1);
    assert_eq!(ticket.reason, LoadReason::Initial);
    assert_eq!(snapshot.load_state, LoadState::Loading);
    assert_eq!(snapshot.active_view, ActiveView::Dashboard);
    assert!(snapshot.reading.is_none());
    assert!(snapshot.last_updated.is_none());
}

#[test]
fn settling_the_latest_ticket_reaches_ready_even_with_empty_slots() {
    let (mut state, ticket) = ViewState::initial(location("Lahore"));
    let mut bundle = bundle_for("Lahore", 42.0);
    bundle.historical = Slot::Empty;
    let completed_at = bundle.completed_at;

    assert_eq!(state.settle(&ticket, bundle), SettleOutcome::Applied);

    let snapshot = state.snapshot();
    assert_eq!(snapshot.load_state, LoadState::Ready);
    assert_eq!(snapshot.last_updated, Some(completed_at));
    assert!(snapshot.historical.is_empty());
    assert!(snapshot.alerts.is_empty());
    assert!(!snapshot.alert_digest().has_active_alerts());
    assert_eq!(
        snapshot.classification().map(|c| c.category),
        Some(AqiCategory::Good)
    );
}

#[test]
fn superseded_ticket_is_stale_in_either_arrival_order() {
    let (mut state, ticket_a) = ViewState::initial(location("Lahore"));
    let ticket_b = state
        .select_location(location("Karachi"))
        .expect("new location issues a ticket");

    // Older result first: dropped, nothing visible changes.
    assert_eq!(
        state.settle(&ticket_a, bundle_for("Lahore", 250.0)),
        SettleOutcome::Stale { latest_seq: 2 }
    );
    assert!(state.snapshot().is_loading());
    assert!(state.snapshot().reading.is_none());

    assert_eq!(
        state.settle(&ticket_b, bundle_for("Karachi", 80.0)),
        SettleOutcome::Applied
    );

    // Older result last: still dropped.
    assert_eq!(
        state.settle(&ticket_a, bundle_for("Lahore", 250.0)),
        SettleOutcome::Stale { latest_seq: 2 }
    );
    let snapshot = state.snapshot();
    assert_eq!(snapshot.location.as_str(), "Karachi");
    assert_eq!(snapshot.reading.as_ref().map(|r| r.index), Some(80.0));
}

#[test]
fn location_change_discards_previous_data() {
    let (mut state, ticket) = ViewState::initial(location("Lahore"));
    state.settle(&ticket, bundle_for("Lahore", 120.0));

    state.select_location(location("Delhi")).expect("ticket");
    let snapshot = state.snapshot();
    assert!(snapshot.is_loading());
    assert!(snapshot.reading.is_none());
    assert!(snapshot.historical.is_empty());
    assert!(snapshot.forecast.is_empty());
    assert!(snapshot.last_updated.is_none());
}

#[test]
fn refresh_keeps_data_visible_until_it_settles() {
    let (mut state, ticket) = ViewState::initial(location("Lahore"));
    state.settle(&ticket, bundle_for("Lahore", 120.0));

    let refresh = state.refresh();
    assert_eq!(refresh.reason, LoadReason::Refresh);
    assert_eq!(refresh.seq, 2);
    assert!(state.snapshot().is_loading());
    assert!(state.snapshot().reading.is_some());

    // A refresh issued before the first one settles supersedes it.
    let second = state.refresh();
    assert!(matches!(
        state.settle(&refresh, bundle_for("Lahore", 10.0)),
        SettleOutcome::Stale { .. }
    ));
    assert_eq!(
        state.settle(&second, bundle_for("Lahore", 130.0)),
        SettleOutcome::Applied
    );
    assert_eq!(state.snapshot().reading.as_ref().map(|r| r.index), Some(130.0));
}

#[test]
fn reselecting_current_location_does_not_fetch() {
    let (mut state, _) = ViewState::initial(location("Lahore"));
    assert!(state.select_location(location("  Lahore ")).is_none());
    assert_eq!(state.latest_seq(), 1);
}

#[test]
fn view_switching_is_independent_of_loading() {
    let (mut state, ticket) = ViewState::initial(location("Lahore"));
    assert!(state.select_view(ActiveView::Health));
    assert!(!state.select_view(ActiveView::Health));
    assert_eq!(state.latest_seq(), 1);
    assert!(state.snapshot().is_loading());

    state.settle(&ticket, bundle_for("Lahore", 60.0));
    state.select_location(location("London")).expect("ticket");
    assert_eq!(state.snapshot().active_view, ActiveView::Health);
}
