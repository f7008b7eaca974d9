//! Per-view models derived from a snapshot on every read.

use chrono::{DateTime, Utc};
use shared::{
    domain::{ActiveView, LocationId},
    protocol::{ForecastPoint, HistoricalPoint, Reading},
};

use crate::{
    alerts::AlertDigest,
    classifier::{classify, AqiCategory, Classification},
    state::DashboardSnapshot,
};

pub const CONCENTRATION_UNIT: &str = "µg/m³";

/// Index movement smaller than this across the window counts as steady.
const STEADY_BAND: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantTile {
    pub symbol: &'static str,
    pub name: &'static str,
    pub value: f64,
}

impl PollutantTile {
    pub fn from_reading(reading: &Reading) -> Vec<PollutantTile> {
        vec![
            PollutantTile {
                symbol: "PM2.5",
                name: "Fine Particles",
                value: reading.pm2_5,
            },
            PollutantTile {
                symbol: "PM10",
                name: "Coarse Particles",
                value: reading.pm10,
            },
            PollutantTile {
                symbol: "CO",
                name: "Carbon Monoxide",
                value: reading.co,
            },
            PollutantTile {
                symbol: "NO₂",
                name: "Nitrogen Dioxide",
                value: reading.no2,
            },
            PollutantTile {
                symbol: "O₃",
                name: "Ozone",
                value: reading.o3,
            },
            PollutantTile {
                symbol: "SO₂",
                name: "Sulfur Dioxide",
                value: reading.so2,
            },
            PollutantTile {
                symbol: "NH₃",
                name: "Ammonia",
                value: reading.nh3,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Rising,
    Falling,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSummary {
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub latest: f64,
    pub direction: TrendDirection,
}

impl TrendSummary {
    /// `None` for an empty series. Points are taken in the order delivered.
    pub fn from_points(points: &[HistoricalPoint]) -> Option<Self> {
        let first = points.first()?.index;
        let latest = points.last()?.index;

        let (min, max, sum) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), point| (min.min(point.index), max.max(point.index), sum + point.index),
        );

        let delta = latest - first;
        let direction = if delta.abs() < STEADY_BAND {
            TrendDirection::Steady
        } else if delta > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Falling
        };

        Some(Self {
            samples: points.len(),
            min,
            max,
            mean: sum / points.len() as f64,
            latest,
            direction,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub location: &'a LocationId,
    pub last_updated: Option<DateTime<Utc>>,
    pub refreshing: bool,
    pub headline: Classification,
    pub pollutants: Vec<PollutantTile>,
    pub alerts: AlertDigest<'a>,
    pub trend: &'a [HistoricalPoint],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay<'a> {
    pub point: &'a ForecastPoint,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView<'a> {
    pub location: &'a LocationId,
    pub days: Vec<ForecastDay<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView<'a> {
    pub location: &'a LocationId,
    pub current: Classification,
    pub fine_particulate: f64,
    pub trend: Option<TrendSummary>,
    pub series: &'a [HistoricalPoint],
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthView<'a> {
    pub location: &'a LocationId,
    pub current: Classification,
    pub legend: &'static [AqiCategory],
}

#[derive(Debug, Clone)]
pub enum ViewModel<'a> {
    /// Nothing to show yet for this location.
    Loading { location: &'a LocationId },
    /// The view needs a reading and the reading slot is empty.
    Unavailable {
        location: &'a LocationId,
        view: ActiveView,
    },
    Dashboard(DashboardView<'a>),
    Forecast(ForecastView<'a>),
    Analytics(AnalyticsView<'a>),
    Health(HealthView<'a>),
}

impl DashboardSnapshot {
    pub fn view_model(&self) -> ViewModel<'_> {
        render(self)
    }
}

pub fn render(snapshot: &DashboardSnapshot) -> ViewModel<'_> {
    let location = &snapshot.location;
    if snapshot.is_loading() && snapshot.reading.is_none() {
        return ViewModel::Loading { location };
    }

    let current = snapshot
        .reading
        .as_ref()
        .map(|reading| (reading, classify(reading.index)));

    match (snapshot.active_view, current) {
        (ActiveView::Forecast, _) => ViewModel::Forecast(ForecastView {
            location,
            days: snapshot
                .forecast
                .iter()
                .map(|point| ForecastDay {
                    point,
                    classification: classify(point.predicted_index),
                })
                .collect(),
        }),
        (view, None) => ViewModel::Unavailable { location, view },
        (ActiveView::Dashboard, Some((reading, current))) => ViewModel::Dashboard(DashboardView {
            location,
            last_updated: snapshot.last_updated,
            refreshing: snapshot.is_loading(),
            headline: current,
            pollutants: PollutantTile::from_reading(reading),
            alerts: snapshot.alert_digest(),
            trend: &snapshot.historical,
        }),
        (ActiveView::Analytics, Some((reading, current))) => ViewModel::Analytics(AnalyticsView {
            location,
            current,
            fine_particulate: reading.pm2_5,
            trend: TrendSummary::from_points(&snapshot.historical),
            series: &snapshot.historical,
        }),
        (ActiveView::Health, Some((_, current))) => ViewModel::Health(HealthView {
            location,
            current,
            legend: &AqiCategory::ALL,
        }),
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
