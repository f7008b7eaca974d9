//! Session-visible dashboard state and the commands that move it.
//!
//! Two independent axes: the data-load axis (`Loading` → `Ready`) and the
//! navigation axis (`ActiveView`). Every command returns a fully determined
//! result; nothing here performs I/O.
//!
//! Each load is issued a [`LoadTicket`] carrying a monotonically increasing
//! sequence number. Only the ticket matching the latest issued sequence may
//! settle into visible state; anything older is reported as stale and dropped,
//! whatever order the results arrive in.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    domain::{ActiveView, LocationId},
    protocol::{Alert, ForecastPoint, HistoricalPoint, Reading},
};

use crate::{
    alerts::{aggregate, AlertDigest},
    classifier::{classify, Classification},
    orchestrator::FetchBundle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadReason {
    Initial,
    LocationChanged,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub location: LocationId,
    pub reason: LoadReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Applied,
    Stale { latest_seq: u64 },
}

/// What every view reads. Views never hold their own copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub location: LocationId,
    pub active_view: ActiveView,
    pub load_state: LoadState,
    pub last_updated: Option<DateTime<Utc>>,
    pub reading: Option<Reading>,
    pub historical: Vec<HistoricalPoint>,
    pub forecast: Vec<ForecastPoint>,
    pub alerts: Vec<Alert>,
}

impl DashboardSnapshot {
    fn empty(location: LocationId, active_view: ActiveView) -> Self {
        Self {
            location,
            active_view,
            load_state: LoadState::Loading,
            last_updated: None,
            reading: None,
            historical: Vec::new(),
            forecast: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Computed on every call; classification is cheap and never cached.
    pub fn classification(&self) -> Option<Classification> {
        self.reading.as_ref().map(|reading| classify(reading.index))
    }

    pub fn alert_digest(&self) -> AlertDigest<'_> {
        aggregate(&self.alerts)
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    snapshot: DashboardSnapshot,
    latest_seq: u64,
}

impl ViewState {
    /// Starts in `Loading` for `location` along with the ticket for that load.
    pub fn initial(location: LocationId) -> (Self, LoadTicket) {
        let mut state = Self {
            snapshot: DashboardSnapshot::empty(location, ActiveView::default()),
            latest_seq: 0,
        };
        let ticket = state.issue(LoadReason::Initial);
        (state, ticket)
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Switches location and discards everything held for the previous one.
    ///
    /// Re-selecting the current location is a no-op and returns `None`.
    pub fn select_location(&mut self, location: LocationId) -> Option<LoadTicket> {
        if location == self.snapshot.location {
            return None;
        }
        self.snapshot = DashboardSnapshot::empty(location, self.snapshot.active_view);
        Some(self.issue(LoadReason::LocationChanged))
    }

    /// Re-fetches the current location; the held data stays visible meanwhile.
    pub fn refresh(&mut self) -> LoadTicket {
        self.snapshot.load_state = LoadState::Loading;
        self.issue(LoadReason::Refresh)
    }

    /// Returns whether the active view changed.
    pub fn select_view(&mut self, view: ActiveView) -> bool {
        let changed = self.snapshot.active_view != view;
        self.snapshot.active_view = view;
        changed
    }

    pub fn settle(&mut self, ticket: &LoadTicket, bundle: FetchBundle) -> SettleOutcome {
        if ticket.seq != self.latest_seq || bundle.location != self.snapshot.location {
            return SettleOutcome::Stale {
                latest_seq: self.latest_seq,
            };
        }

        self.snapshot.reading = bundle.reading.into_option();
        self.snapshot.historical = bundle.historical.into_value_or_default();
        self.snapshot.forecast = bundle.forecast.into_value_or_default();
        self.snapshot.alerts = bundle.alerts.into_value_or_default();
        self.snapshot.last_updated = Some(bundle.completed_at);
        self.snapshot.load_state = LoadState::Ready;
        SettleOutcome::Applied
    }

    fn issue(&mut self, reason: LoadReason) -> LoadTicket {
        self.latest_seq += 1;
        self.snapshot.load_state = LoadState::Loading;
        LoadTicket {
            seq: self.latest_seq,
            location: self.snapshot.location.clone(),
            reason,
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
