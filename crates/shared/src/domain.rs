use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LocationError;

/// Opaque, case-preserving location identifier (usually a city name).
///
/// Always non-empty and trimmed; construct through [`LocationId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

impl LocationId {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, LocationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LocationError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocationId {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocationId {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LocationId> for String {
    fn from(value: LocationId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    Dashboard,
    Forecast,
    Analytics,
    Health,
}

impl ActiveView {
    pub const ALL: [ActiveView; 4] = [
        ActiveView::Dashboard,
        ActiveView::Forecast,
        ActiveView::Analytics,
        ActiveView::Health,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActiveView::Dashboard => "dashboard",
            ActiveView::Forecast => "forecast",
            ActiveView::Analytics => "analytics",
            ActiveView::Health => "health",
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActiveView {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ActiveView::ALL
            .into_iter()
            .find(|view| view.as_str() == wanted)
            .ok_or_else(|| UnknownView(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view '{0}' (expected dashboard, forecast, analytics or health)")]
pub struct UnknownView(pub String);

/// Alert severity as delivered by the provider.
///
/// Only `"high"` is distinguished; every other label (the backend also emits
/// `"medium"`) is folded into `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertSeverity {
    #[default]
    Standard,
    High,
}

impl AlertSeverity {
    pub fn is_high(self) -> bool {
        self == AlertSeverity::High
    }
}

impl From<String> for AlertSeverity {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("high") {
            AlertSeverity::High
        } else {
            AlertSeverity::Standard
        }
    }
}

impl From<AlertSeverity> for String {
    fn from(value: AlertSeverity) -> Self {
        match value {
            AlertSeverity::High => "high".to_string(),
            AlertSeverity::Standard => "standard".to_string(),
        }
    }
}
