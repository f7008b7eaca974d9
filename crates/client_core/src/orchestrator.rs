use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use shared::{
    domain::LocationId,
    error::FetchError,
    protocol::{Alert, ForecastPoint, HistoricalPoint, Reading},
};
use tracing::{debug, warn};

use crate::provider::AirQualityProvider;

/// Outcome of one of the four queries once failures have been absorbed.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Loaded(T),
    Empty,
}

impl<T> Slot<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Slot::Loaded(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Slot::Loaded(value) => Some(value),
            Slot::Empty => None,
        }
    }
}

impl<T: Default> Slot<T> {
    pub fn into_value_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Reading,
    Historical,
    Forecast,
    Alerts,
}

impl SlotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotKind::Reading => "reading",
            SlotKind::Historical => "historical",
            SlotKind::Forecast => "forecast",
            SlotKind::Alerts => "alerts",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one invocation produced, published as a single unit.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchBundle {
    pub location: LocationId,
    pub reading: Slot<Reading>,
    pub historical: Slot<Vec<HistoricalPoint>>,
    pub forecast: Slot<Vec<ForecastPoint>>,
    pub alerts: Slot<Vec<Alert>>,
    pub completed_at: DateTime<Utc>,
}

impl FetchBundle {
    pub fn empty_slots(&self) -> Vec<SlotKind> {
        let mut empty = Vec::new();
        if !self.reading.is_loaded() {
            empty.push(SlotKind::Reading);
        }
        if !self.historical.is_loaded() {
            empty.push(SlotKind::Historical);
        }
        if !self.forecast.is_loaded() {
            empty.push(SlotKind::Forecast);
        }
        if !self.alerts.is_loaded() {
            empty.push(SlotKind::Alerts);
        }
        empty
    }
}

#[derive(Clone)]
pub struct FetchOrchestrator {
    provider: Arc<dyn AirQualityProvider>,
}

impl FetchOrchestrator {
    pub fn new(provider: Arc<dyn AirQualityProvider>) -> Self {
        Self { provider }
    }

    /// Runs the four queries concurrently and returns once all have settled.
    /// Never fails: a failed query leaves its slot empty.
    pub async fn fetch_all(&self, location: &LocationId) -> FetchBundle {
        let provider = self.provider.as_ref();
        let (reading, historical, forecast, alerts) = tokio::join!(
            provider.current_reading(location),
            provider.historical(location),
            provider.forecast(location),
            provider.alerts(location),
        );

        let bundle = FetchBundle {
            location: location.clone(),
            reading: absorb(SlotKind::Reading, location, reading),
            historical: absorb(SlotKind::Historical, location, historical),
            forecast: absorb(SlotKind::Forecast, location, forecast),
            alerts: absorb(SlotKind::Alerts, location, alerts),
            completed_at: Utc::now(),
        };

        debug!(
            %location,
            empty_slots = bundle.empty_slots().len(),
            "fetch invocation settled"
        );
        bundle
    }
}

fn absorb<T>(slot: SlotKind, location: &LocationId, result: Result<T, FetchError>) -> Slot<T> {
    match result {
        Ok(value) => Slot::Loaded(value),
        Err(err) => {
            warn!(
                %slot,
                %location,
                kind = ?err.kind(),
                error = %err,
                "provider query failed; slot left empty"
            );
            Slot::Empty
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
