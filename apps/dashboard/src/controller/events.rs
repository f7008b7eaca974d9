//! Events flowing from the backend worker to the output loop.

use client_core::{session::SessionEvent, state::LoadReason, DashboardSnapshot};
use shared::domain::LocationId;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    Error(String),
    Loading {
        location: LocationId,
        reason: LoadReason,
    },
    SnapshotUpdated(Box<DashboardSnapshot>),
    Stopped,
}

impl UiEvent {
    /// `None` for session events the output loop has no use for.
    pub fn from_session(event: SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::LoadingStarted {
                location, reason, ..
            } => Some(UiEvent::Loading { location, reason }),
            SessionEvent::DataAvailable(snapshot) => Some(UiEvent::SnapshotUpdated(snapshot)),
            SessionEvent::StaleResultDiscarded { .. } | SessionEvent::ViewChanged(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_results_are_not_forwarded() {
        let location = LocationId::parse("Lahore").expect("location");
        assert!(UiEvent::from_session(SessionEvent::StaleResultDiscarded {
            seq: 3,
            location: location.clone(),
        })
        .is_none());
        assert!(matches!(
            UiEvent::from_session(SessionEvent::LoadingStarted {
                seq: 4,
                location,
                reason: LoadReason::Refresh,
            }),
            Some(UiEvent::Loading {
                reason: LoadReason::Refresh,
                ..
            })
        ));
    }
}
