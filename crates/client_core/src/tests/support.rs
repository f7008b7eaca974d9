//! Scripted in-memory provider shared by the crate's tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{AlertSeverity, LocationId},
    error::FetchError,
    protocol::{Alert, ForecastPoint, HistoricalPoint, Reading},
};
use tokio::sync::Semaphore;

use crate::provider::AirQualityProvider;

#[derive(Clone)]
pub(crate) struct LocationScript {
    pub reading: Result<Reading, FetchError>,
    pub historical: Result<Vec<HistoricalPoint>, FetchError>,
    pub forecast: Result<Vec<ForecastPoint>, FetchError>,
    pub alerts: Result<Vec<Alert>, FetchError>,
}

impl LocationScript {
    pub fn healthy(location: &str, index: f64) -> Self {
        Self {
            reading: Ok(reading(location, index)),
            historical: Ok(vec![
                HistoricalPoint {
                    time: "06:00".to_string(),
                    index: index - 20.0,
                    pm2_5: Some(30.0),
                    pm10: Some(50.0),
                    co: Some(250.0),
                },
                HistoricalPoint {
                    time: "07:00".to_string(),
                    index,
                    pm2_5: Some(35.0),
                    pm10: Some(55.0),
                    co: Some(260.0),
                },
            ]),
            forecast: Ok((1..=7)
                .map(|day| ForecastPoint {
                    day: format!("Day {day}"),
                    predicted_index: index + f64::from(day),
                    confidence: Some(80.0),
                })
                .collect()),
            alerts: Ok(vec![Alert {
                id: 1,
                location: location.to_string(),
                severity: AlertSeverity::High,
                message: format!("Air quality is very poor in {location}."),
                time: "5 mins ago".to_string(),
            }]),
        }
    }

    pub fn with_failing_alerts(mut self) -> Self {
        self.alerts = Err(FetchError::transport("connection reset"));
        self
    }

    pub fn all_failing() -> Self {
        Self {
            reading: Err(FetchError::transport("connection refused")),
            historical: Err(FetchError::Status {
                status: 404,
                message: "City not found".to_string(),
            }),
            forecast: Err(FetchError::decode("expected value at line 1 column 1")),
            alerts: Err(FetchError::transport("connection refused")),
        }
    }
}

pub(crate) fn reading(location: &str, index: f64) -> Reading {
    Reading {
        location: location.to_string(),
        index,
        pm2_5: 35.0,
        pm10: 55.0,
        co: 260.0,
        no: 0.2,
        no2: 18.5,
        o3: 40.1,
        so2: 6.3,
        nh3: 2.2,
        observed_at: Utc
            .with_ymd_and_hms(2024, 11, 2, 7, 0, 0)
            .single()
            .expect("fixed timestamp"),
    }
}

pub(crate) fn location(raw: &str) -> LocationId {
    LocationId::parse(raw).expect("location")
}

/// Answers from per-location scripts. A gated location holds every query
/// until [`ScriptedProvider::release`] is called for it.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    scripts: Mutex<HashMap<String, LocationScript>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    reading_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, location: &str, script: LocationScript) {
        self.scripts
            .lock()
            .expect("scripts")
            .insert(location.to_string(), script);
    }

    pub fn gate(&self, location: &str) {
        self.gates
            .lock()
            .expect("gates")
            .insert(location.to_string(), Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, location: &str) {
        if let Some(gate) = self.gates.lock().expect("gates").get(location) {
            gate.add_permits(1);
        }
    }

    /// One per orchestrator invocation, since each asks for exactly one reading.
    pub fn fetch_count(&self) -> usize {
        self.reading_calls.load(Ordering::SeqCst)
    }

    async fn wait_for_gate(&self, location: &LocationId) {
        let gate = self
            .gates
            .lock()
            .expect("gates")
            .get(location.as_str())
            .cloned();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }
    }

    fn script_for(&self, location: &LocationId) -> LocationScript {
        self.scripts
            .lock()
            .expect("scripts")
            .get(location.as_str())
            .cloned()
            .unwrap_or_else(LocationScript::all_failing)
    }
}

#[async_trait]
impl AirQualityProvider for ScriptedProvider {
    async fn current_reading(&self, location: &LocationId) -> Result<Reading, FetchError> {
        self.reading_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate(location).await;
        self.script_for(location).reading
    }

    async fn historical(&self, location: &LocationId) -> Result<Vec<HistoricalPoint>, FetchError> {
        self.wait_for_gate(location).await;
        self.script_for(location).historical
    }

    async fn forecast(&self, location: &LocationId) -> Result<Vec<ForecastPoint>, FetchError> {
        self.wait_for_gate(location).await;
        self.script_for(location).forecast
    }

    async fn alerts(&self, location: &LocationId) -> Result<Vec<Alert>, FetchError> {
        self.wait_for_gate(location).await;
        self.script_for(location).alerts
    }
}
